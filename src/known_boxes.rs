use crate::boxes::TypeTag;

/// How the content of a box type is structured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// Content is a plain sequence of child boxes.
    Container,
    /// Content starts with version and flags.
    Full,
    /// Anything else: opaque or box-specific payload.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownBox {
    pub tag: TypeTag,
    pub kind: BoxKind,
    pub full_name: &'static str,
}

const fn known(tag: &str, kind: BoxKind, full_name: &'static str) -> KnownBox {
    KnownBox {
        tag: TypeTag::from_ascii(tag),
        kind,
        full_name,
    }
}

use BoxKind::{Container, Full, Plain};

/// Box types the walker and dumpers recognise.
///
/// `meta`, `stsd` and `dref` hold child boxes after a version/flags prefix,
/// so they are listed as full boxes and are not walked as containers.
pub static KNOWN_BOXES: &[KnownBox] = &[
    // file level
    known("ftyp", Plain, "File Type Box"),
    known("styp", Plain, "Segment Type Box"),
    known("moov", Container, "Movie Box"),
    known("mdat", Plain, "Media Data Box"),
    known("free", Plain, "Free Space Box"),
    known("skip", Plain, "Free Space Box"),
    known("wide", Plain, "Wide Box"),
    known("uuid", Plain, "User Extension Box"),
    known("pdin", Full, "Progressive Download Information Box"),
    known("sidx", Full, "Segment Index Box"),
    known("ssix", Full, "Subsegment Index Box"),
    known("prft", Full, "Producer Reference Time Box"),
    known("emsg", Full, "Event Message Box"),
    known("mfra", Container, "Movie Fragment Random Access Box"),
    known("tfra", Full, "Track Fragment Random Access Box"),
    known("mfro", Full, "Movie Fragment Random Access Offset Box"),
    // movie
    known("mvhd", Full, "Movie Header Box"),
    known("trak", Container, "Track Box"),
    known("udta", Container, "User Data Box"),
    known("cprt", Full, "Copyright Box"),
    known("meta", Full, "Meta Box"),
    known("mvex", Container, "Movie Extends Box"),
    known("mehd", Full, "Movie Extends Header Box"),
    known("trex", Full, "Track Extends Box"),
    // track
    known("tkhd", Full, "Track Header Box"),
    known("tref", Container, "Track Reference Box"),
    known("edts", Container, "Edit Box"),
    known("elst", Full, "Edit List Box"),
    known("mdia", Container, "Media Box"),
    known("mdhd", Full, "Media Header Box"),
    known("hdlr", Full, "Handler Reference Box"),
    known("elng", Full, "Extended Language Box"),
    known("minf", Container, "Media Information Box"),
    known("vmhd", Full, "Video Media Header Box"),
    known("smhd", Full, "Sound Media Header Box"),
    known("hmhd", Full, "Hint Media Header Box"),
    known("nmhd", Full, "Null Media Header Box"),
    known("sthd", Full, "Subtitle Media Header Box"),
    known("dinf", Container, "Data Information Box"),
    known("dref", Full, "Data Reference Box"),
    known("url ", Full, "Data Entry URL Box"),
    known("urn ", Full, "Data Entry URN Box"),
    // sample table
    known("stbl", Container, "Sample Table Box"),
    known("stsd", Full, "Sample Description Box"),
    known("stts", Full, "Decoding Time to Sample Box"),
    known("ctts", Full, "Composition Time to Sample Box"),
    known("cslg", Full, "Composition to Decode Box"),
    known("stsc", Full, "Sample To Chunk Box"),
    known("stsz", Full, "Sample Size Box"),
    known("stz2", Full, "Compact Sample Size Box"),
    known("stco", Full, "Chunk Offset Box"),
    known("co64", Full, "64-bit Chunk Offset Box"),
    known("stss", Full, "Sync Sample Box"),
    known("stsh", Full, "Shadow Sync Sample Box"),
    known("padb", Full, "Padding Bits Box"),
    known("stdp", Full, "Degradation Priority Box"),
    known("sdtp", Full, "Independent and Disposable Samples Box"),
    known("sbgp", Full, "Sample to Group Box"),
    known("sgpd", Full, "Sample Group Description Box"),
    known("subs", Full, "Sub-Sample Information Box"),
    known("saiz", Full, "Sample Auxiliary Information Sizes Box"),
    known("saio", Full, "Sample Auxiliary Information Offsets Box"),
    // fragments
    known("moof", Container, "Movie Fragment Box"),
    known("mfhd", Full, "Movie Fragment Header Box"),
    known("traf", Container, "Track Fragment Box"),
    known("tfhd", Full, "Track Fragment Header Box"),
    known("trun", Full, "Track Fragment Run Box"),
    known("tfdt", Full, "Track Fragment Decode Time Box"),
    // protection
    known("sinf", Container, "Protection Scheme Information Box"),
    known("ipro", Full, "Item Protection Box"),
    known("frma", Plain, "Original Format Box"),
    known("schm", Full, "Scheme Type Box"),
    known("schi", Container, "Scheme Information Box"),
    known("tenc", Full, "Track Encryption Box"),
    known("pssh", Full, "Protection System Specific Header Box"),
    known("senc", Full, "Sample Encryption Box"),
    // items
    known("iloc", Full, "Item Location Box"),
    known("iinf", Full, "Item Information Box"),
    known("infe", Full, "Item Information Entry"),
    known("iref", Full, "Item Reference Box"),
    known("pitm", Full, "Primary Item Box"),
    known("iprp", Container, "Item Properties Box"),
    known("ipco", Container, "Item Property Container Box"),
    known("ipma", Full, "Item Property Association Box"),
    known("meco", Container, "Additional Metadata Container Box"),
    known("mere", Full, "Metabox Relation Box"),
    // sample entries and their children
    known("avc1", Plain, "AVC Sample Entry"),
    known("avc3", Plain, "AVC Sample Entry"),
    known("avcC", Plain, "AVC Configuration Box"),
    known("hvc1", Plain, "HEVC Sample Entry"),
    known("hev1", Plain, "HEVC Sample Entry"),
    known("hvcC", Plain, "HEVC Configuration Box"),
    known("vp09", Plain, "VP9 Sample Entry"),
    known("av01", Plain, "AV1 Sample Entry"),
    known("mp4v", Plain, "MPEG-4 Visual Sample Entry"),
    known("mp4a", Plain, "MPEG-4 Audio Sample Entry"),
    known("ac-3", Plain, "AC-3 Sample Entry"),
    known("ec-3", Plain, "E-AC-3 Sample Entry"),
    known("Opus", Plain, "Opus Sample Entry"),
    known("fLaC", Plain, "FLAC Sample Entry"),
    known("esds", Full, "Elementary Stream Descriptor Box"),
    known("pasp", Plain, "Pixel Aspect Ratio Box"),
    known("colr", Plain, "Colour Information Box"),
    known("btrt", Plain, "Bit Rate Box"),
];

impl KnownBox {
    pub fn lookup(tag: TypeTag) -> Option<&'static KnownBox> {
        KNOWN_BOXES.iter().find(|k| k.tag == tag)
    }

    pub fn is_container(&self) -> bool {
        self.kind == BoxKind::Container
    }

    pub fn is_full_box(&self) -> bool {
        self.kind == BoxKind::Full
    }
}

/// Whether the walker descends into boxes of this type.
pub fn is_container(tag: TypeTag) -> bool {
    KnownBox::lookup(tag).is_some_and(KnownBox::is_container)
}

pub fn is_full_box(tag: TypeTag) -> bool {
    KnownBox::lookup(tag).is_some_and(KnownBox::is_full_box)
}

pub fn full_name(tag: TypeTag) -> &'static str {
    KnownBox::lookup(tag).map_or("Unknown Box", |k| k.full_name)
}
