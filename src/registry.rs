use crate::boxes::{BoxKey, TypeTag};
use crate::dump::DumpError;
use crate::typed::{
    ChunkOffset64BoxView, ChunkOffsetBoxView, FileTypeBoxView, HandlerBoxView, MediaHeaderBoxView,
    MovieHeaderBoxView, SampleDescriptionBoxView, SampleEntryBoxView, SampleSizeBoxView,
    TrackHeaderBoxView, Validate,
};
use crate::view::{BoxView, FullBoxView};
use log::debug;
use std::collections::HashMap;

/// A value returned from a box decoder.
///
/// Decoders may return either a human-readable text summary or structured data.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxValue {
    Text(String),
    Structured(StructuredData),
}

/// Structured data for the boxes the default registry understands.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StructuredData {
    /// File Type Box (ftyp)
    FileType(FtypData),
    /// Movie Header Box (mvhd)
    MovieHeader(MvhdData),
    /// Track Header Box (tkhd)
    TrackHeader(TkhdData),
    /// Media Header Box (mdhd)
    MediaHeader(MdhdData),
    /// Handler Reference Box (hdlr)
    HandlerReference(HdlrData),
    /// Chunk Offset Box (stco)
    ChunkOffset(StcoData),
    /// 64-bit Chunk Offset Box (co64)
    ChunkOffset64(Co64Data),
    /// Sample Size Box (stsz)
    SampleSize(StszData),
    /// Sample Description Box (stsd)
    SampleDescription(StsdData),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FtypData {
    pub major_brand: String,
    pub minor_version: u32,
    pub compatible_brands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MvhdData {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub rate: [u16; 2],
    pub volume: [u8; 2],
    pub reserved_0: u16,
    pub reserved_1: [u32; 2],
    pub matrix: [u32; 9],
    pub pre_defined: [u32; 6],
    pub next_track_id: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TkhdData {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub reserved_0: u32,
    pub duration: u64,
    pub reserved_1: [u32; 2],
    pub layer: u16,
    pub alternate_group: u16,
    pub volume: u16,
    pub reserved_2: u16,
    pub matrix: [u32; 9],
    pub width: [u16; 2],
    pub height: [u16; 2],
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MdhdData {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub pad: bool,
    /// Packed 5-bit codes, each the letter minus 0x60.
    pub language: [u8; 3],
    pub pre_defined: u16,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HdlrData {
    pub version: u8,
    pub flags: u32,
    pub pre_defined: u32,
    pub handler_type: String,
    pub reserved: [u32; 3],
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StcoData {
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub chunk_offsets: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Co64Data {
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub chunk_offsets: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StszData {
    pub version: u8,
    pub flags: u32,
    /// `None` when every sample carries its own size.
    pub default_sample_size: Option<u32>,
    pub samples_count: u32,
    pub sample_sizes: Vec<u32>, // Empty if default_sample_size is set
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StsdData {
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub entries: Vec<SampleEntry>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SampleEntry {
    pub format: String,
    pub header_size: u8,
    /// Content size of the entry box.
    pub size: Option<u64>,
    pub reserved: [u8; 6],
    pub data_reference_index: u16,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

/// Trait for custom box decoders.
///
/// A decoder interprets one box (identified by a [`BoxKey`]). It returns
/// `Ok(None)` when the box does not have the shape it expects, and
/// [`DumpError`] when the shape checks out but a field still cannot be read.
pub trait BoxDecoder: Send + Sync {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError>;
}

/// Registry of decoders keyed by `BoxKey` (4CC or UUID).
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently.
pub struct Registry {
    map: HashMap<BoxKey, BoxDecoderEntry>,
}

struct BoxDecoderEntry {
    inner: Box<dyn BoxDecoder>,
    name: String,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Return a new registry with the given decoder added.
    ///
    /// `name` is human-readable and used only for logging.
    pub fn with_decoder(mut self, key: BoxKey, name: &str, dec: Box<dyn BoxDecoder>) -> Self {
        self.map.insert(
            key,
            BoxDecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn contains(&self, key: &BoxKey) -> bool {
        self.map.contains_key(key)
    }

    /// Decode a box with the decoder registered for its key.
    ///
    /// Returns `Ok(None)` if no decoder exists for the box or the decoder
    /// does not recognise it.
    pub fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        let Ok(header) = view.header() else {
            return Ok(None);
        };
        let Some(entry) = self.map.get(&header.key()) else {
            return Ok(None);
        };
        let value = entry.inner.decode(view)?;
        if value.is_none() {
            debug!("{} rejected {} box", entry.name, header.typ);
        }
        Ok(value)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------- Helpers ----------

fn field<T>(value: Option<T>, view: &'static str, name: &'static str) -> Result<T, DumpError> {
    value.ok_or(DumpError::MissingField { view, field: name })
}

/// Version and flags of a box that already validated as a full box.
fn version_flags(full: &FullBoxView<'_>, view: &'static str) -> Result<(u8, u32), DumpError> {
    let header = field(full.header(), view, "header")?;
    Ok((header.version, header.flags.bits()))
}

fn structured(data: StructuredData) -> Result<Option<BoxValue>, DumpError> {
    Ok(Some(BoxValue::Structured(data)))
}

fn tag_string(tag: TypeTag) -> String {
    tag.as_str_lossy()
}

// ---------- Decoders ----------

pub struct FtypDecoder;

impl BoxDecoder for FtypDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "FileTypeBoxView";
        let ftyp = FileTypeBoxView::new(view);
        if ftyp.is_not_valid() {
            return Ok(None);
        }
        let brands = field(ftyp.compatible_brands(), VIEW, "compatible_brands")?;
        let data = FtypData {
            major_brand: tag_string(field(ftyp.major_brand(), VIEW, "major_brand")?),
            minor_version: field(ftyp.minor_version(), VIEW, "minor_version")?,
            compatible_brands: brands.map(tag_string).collect(),
        };
        structured(StructuredData::FileType(data))
    }
}

pub struct MvhdDecoder;

impl BoxDecoder for MvhdDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "MovieHeaderBoxView";
        let full = FullBoxView::new(view);
        let mvhd = MovieHeaderBoxView::new(full);
        if mvhd.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let data = MvhdData {
            version,
            flags,
            creation_time: field(mvhd.creation_time(), VIEW, "creation_time")?,
            modification_time: field(mvhd.modification_time(), VIEW, "modification_time")?,
            timescale: field(mvhd.timescale(), VIEW, "timescale")?,
            duration: field(mvhd.duration(), VIEW, "duration")?,
            rate: field(mvhd.rate(), VIEW, "rate")?,
            volume: field(mvhd.volume(), VIEW, "volume")?,
            reserved_0: field(mvhd.reserved_0(), VIEW, "reserved_0")?,
            reserved_1: field(mvhd.reserved_1(), VIEW, "reserved_1")?,
            matrix: field(mvhd.matrix(), VIEW, "matrix")?,
            pre_defined: field(mvhd.pre_defined(), VIEW, "pre_defined")?,
            next_track_id: field(mvhd.next_track_id(), VIEW, "next_track_ID")?,
        };
        structured(StructuredData::MovieHeader(data))
    }
}

pub struct TkhdDecoder;

impl BoxDecoder for TkhdDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "TrackHeaderBoxView";
        let full = FullBoxView::new(view);
        let tkhd = TrackHeaderBoxView::new(full);
        if tkhd.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let data = TkhdData {
            version,
            flags,
            creation_time: field(tkhd.creation_time(), VIEW, "creation_time")?,
            modification_time: field(tkhd.modification_time(), VIEW, "modification_time")?,
            track_id: field(tkhd.track_id(), VIEW, "track_ID")?,
            reserved_0: field(tkhd.reserved_0(), VIEW, "reserved_0")?,
            duration: field(tkhd.duration(), VIEW, "duration")?,
            reserved_1: field(tkhd.reserved_1(), VIEW, "reserved_1")?,
            layer: field(tkhd.layer(), VIEW, "layer")?,
            alternate_group: field(tkhd.alternate_group(), VIEW, "alternate_group")?,
            volume: field(tkhd.volume(), VIEW, "volume")?,
            reserved_2: field(tkhd.reserved_2(), VIEW, "reserved_2")?,
            matrix: field(tkhd.matrix(), VIEW, "matrix")?,
            width: field(tkhd.width(), VIEW, "width")?,
            height: field(tkhd.height(), VIEW, "height")?,
        };
        structured(StructuredData::TrackHeader(data))
    }
}

pub struct MdhdDecoder;

impl BoxDecoder for MdhdDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "MediaHeaderBoxView";
        let full = FullBoxView::new(view);
        let mdhd = MediaHeaderBoxView::new(full);
        if mdhd.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let data = MdhdData {
            version,
            flags,
            creation_time: field(mdhd.creation_time(), VIEW, "creation_time")?,
            modification_time: field(mdhd.modification_time(), VIEW, "modification_time")?,
            timescale: field(mdhd.timescale(), VIEW, "timescale")?,
            duration: field(mdhd.duration(), VIEW, "duration")?,
            pad: field(mdhd.pad(), VIEW, "pad")?,
            language: field(mdhd.language(), VIEW, "language")?.0,
            pre_defined: field(mdhd.pre_defined(), VIEW, "pre_defined")?,
        };
        structured(StructuredData::MediaHeader(data))
    }
}

pub struct HdlrDecoder;

impl BoxDecoder for HdlrDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "HandlerBoxView";
        let full = FullBoxView::new(view);
        let hdlr = HandlerBoxView::new(full);
        if hdlr.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let data = HdlrData {
            version,
            flags,
            pre_defined: field(hdlr.pre_defined(), VIEW, "pre_defined")?,
            handler_type: tag_string(field(hdlr.handler_type(), VIEW, "handler_type")?),
            reserved: field(hdlr.reserved(), VIEW, "reserved")?,
            name: field(hdlr.name_lossy(), VIEW, "name")?.into_owned(),
        };
        structured(StructuredData::HandlerReference(data))
    }
}

pub struct StcoDecoder;

impl BoxDecoder for StcoDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "ChunkOffsetBoxView";
        let full = FullBoxView::new(view);
        let stco = ChunkOffsetBoxView::new(full);
        if stco.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let data = StcoData {
            version,
            flags,
            entry_count: field(stco.entry_count(), VIEW, "entry_count")?,
            chunk_offsets: field(stco.offsets(), VIEW, "chunk_offsets")?.collect(),
        };
        structured(StructuredData::ChunkOffset(data))
    }
}

pub struct Co64Decoder;

impl BoxDecoder for Co64Decoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "ChunkOffset64BoxView";
        let full = FullBoxView::new(view);
        let co64 = ChunkOffset64BoxView::new(full);
        if co64.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let data = Co64Data {
            version,
            flags,
            entry_count: field(co64.entry_count(), VIEW, "entry_count")?,
            chunk_offsets: field(co64.offsets(), VIEW, "chunk_offsets")?.collect(),
        };
        structured(StructuredData::ChunkOffset64(data))
    }
}

pub struct StszDecoder;

impl BoxDecoder for StszDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "SampleSizeBoxView";
        let full = FullBoxView::new(view);
        let stsz = SampleSizeBoxView::new(full);
        if stsz.is_not_valid() {
            return Ok(None);
        }
        let (version, flags) = version_flags(&full, VIEW)?;
        let samples_count = field(stsz.samples_count(), VIEW, "samples_count")?;
        let default_sample_size = stsz.default_sample_size();
        let sample_sizes = match default_sample_size {
            Some(_) => Vec::new(),
            None => (0..samples_count)
                .map(|i| field(stsz.sample_size_at(i), VIEW, "sample_size"))
                .collect::<Result<_, _>>()?,
        };
        let data = StszData {
            version,
            flags,
            default_sample_size,
            samples_count,
            sample_sizes,
        };
        structured(StructuredData::SampleSize(data))
    }
}

pub struct StsdDecoder;

impl StsdDecoder {
    fn entry(entry: SampleEntryBoxView<'_>) -> Result<SampleEntry, DumpError> {
        const VIEW: &str = "SampleEntryBoxView";
        let header = field(entry.header(), VIEW, "header")?;
        let dimensions = entry.dimensions();
        Ok(SampleEntry {
            format: tag_string(header.typ),
            header_size: header.header_size,
            size: header.content_size,
            reserved: field(entry.reserved(), VIEW, "reserved")?,
            data_reference_index: field(
                entry.data_reference_index(),
                VIEW,
                "data_reference_index",
            )?,
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
        })
    }
}

impl BoxDecoder for StsdDecoder {
    fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
        const VIEW: &str = "SampleDescriptionBoxView";
        let full = FullBoxView::new(view);
        let stsd = SampleDescriptionBoxView::new(full);
        let entries = match stsd.try_entries() {
            Ok(entries) => entries,
            Err(status) => {
                debug!("stsd not decoded: {status:?}");
                return Ok(None);
            }
        };
        let (version, flags) = version_flags(&full, VIEW)?;
        let entry_count = entries.remaining();
        let entries = entries.map(Self::entry).collect::<Result<Vec<_>, _>>()?;
        let data = StsdData {
            version,
            flags,
            entry_count,
            entries,
        };
        structured(StructuredData::SampleDescription(data))
    }
}

fn fourcc(tag: &str) -> BoxKey {
    BoxKey::FourCC(TypeTag::from_ascii(tag))
}

/// Build the default registry with all known box decoders.
pub fn default_registry() -> Registry {
    Registry::new()
        .with_decoder(fourcc("ftyp"), "ftyp", Box::new(FtypDecoder))
        .with_decoder(fourcc("mvhd"), "mvhd", Box::new(MvhdDecoder))
        .with_decoder(fourcc("tkhd"), "tkhd", Box::new(TkhdDecoder))
        .with_decoder(fourcc("mdhd"), "mdhd", Box::new(MdhdDecoder))
        .with_decoder(fourcc("hdlr"), "hdlr", Box::new(HdlrDecoder))
        .with_decoder(fourcc("stco"), "stco", Box::new(StcoDecoder))
        .with_decoder(fourcc("co64"), "co64", Box::new(Co64Decoder))
        .with_decoder(fourcc("stsz"), "stsz", Box::new(StszDecoder))
        .with_decoder(fourcc("stsd"), "stsd", Box::new(StsdDecoder))
}
