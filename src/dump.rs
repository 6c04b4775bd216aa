//! Text rendering of headers and decoded box values.
//!
//! Everything renders as `{name: value, ...}`. Fields that do not apply
//! (an 8-byte header size, an undeclared size, an absent user type) are
//! left out.

use crate::boxes::{BoxHeader, FullBoxHeader, is_print};
use crate::registry::{
    BoxValue, Co64Data, FtypData, HdlrData, MdhdData, MvhdData, SampleEntry, StcoData,
    StructuredData, StsdData, StszData, TkhdData,
};
use crate::typed::Language;
use std::fmt::{self, Write};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    /// A box passed validation but one of its accessors still came back empty.
    #[error("{view}: {field} parse failure")]
    MissingField {
        view: &'static str,
        field: &'static str,
    },
}

/// `"abcd"` when every byte is printable, else a `0x..` byte list.
fn fmt_bytes(out: &mut impl Write, bytes: &[u8], quote: bool) -> fmt::Result {
    if bytes.iter().all(|&c| is_print(c)) {
        let text: String = bytes.iter().map(|&c| c as char).collect();
        if quote {
            write!(out, "\"{text}\"")
        } else {
            out.write_str(&text)
        }
    } else {
        out.write_char('[')?;
        for (i, b) in bytes.iter().enumerate() {
            if i != 0 {
                out.write_str(", ")?;
            }
            write!(out, "{b:#x}")?;
        }
        out.write_char(']')
    }
}

fn fmt_header_fields(
    out: &mut impl Write,
    typ: &[u8],
    header_size: u8,
    size: Option<u64>,
    user_type: Option<&[u8]>,
) -> fmt::Result {
    out.write_str("type: ")?;
    fmt_bytes(out, typ, true)?;
    if header_size != 8 {
        write!(out, ", header_size: {header_size}")?;
    }
    if let Some(size) = size {
        write!(out, ", size: {size}")?;
    }
    if let Some(user_type) = user_type {
        out.write_str(", user_type: ")?;
        fmt_bytes(out, user_type, false)?;
    }
    Ok(())
}

fn header_fields(header: &BoxHeader) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = fmt_header_fields(
        &mut out,
        header.typ.as_bytes(),
        header.header_size,
        header.content_size,
        header.user_type.as_ref().map(|u| &u.0[..]),
    );
    out
}

/// `{type: "moov", size: 1024}`
pub fn dump_header(header: &BoxHeader) -> String {
    format!("{{{}}}", header_fields(header))
}

/// `{type: "mvhd", size: 100, version: 0, flags: 0b000000000000000000000000}`
pub fn dump_full_header(header: &FullBoxHeader) -> String {
    format!(
        "{{{}, version: {}, flags: {}}}",
        header_fields(&header.header),
        header.version,
        header.flags
    )
}

impl fmt::Display for BoxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxValue::Text(s) => f.write_str(s),
            BoxValue::Structured(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl fmt::Display for StructuredData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredData::FileType(d) => fmt::Display::fmt(d, f),
            StructuredData::MovieHeader(d) => fmt::Display::fmt(d, f),
            StructuredData::TrackHeader(d) => fmt::Display::fmt(d, f),
            StructuredData::MediaHeader(d) => fmt::Display::fmt(d, f),
            StructuredData::HandlerReference(d) => fmt::Display::fmt(d, f),
            StructuredData::ChunkOffset(d) => fmt::Display::fmt(d, f),
            StructuredData::ChunkOffset64(d) => fmt::Display::fmt(d, f),
            StructuredData::SampleSize(d) => fmt::Display::fmt(d, f),
            StructuredData::SampleDescription(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl fmt::Display for FtypData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{major_brand: {:?}, minor_version: {}",
            self.major_brand, self.minor_version
        )?;
        if !self.compatible_brands.is_empty() {
            write!(f, ", compatible_brands: {:?}", self.compatible_brands)?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for MvhdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{creation_time: {}, modification_time: {}, timescale: {}, duration: {}, \
             rate: {:?}, volume: {:?}, reserved_0: {}, reserved_1: {:?}, matrix: {:?}, \
             pre_defined: {:?}, next_track_ID: {}}}",
            self.creation_time,
            self.modification_time,
            self.timescale,
            self.duration,
            self.rate,
            self.volume,
            self.reserved_0,
            self.reserved_1,
            self.matrix,
            self.pre_defined,
            self.next_track_id
        )
    }
}

impl fmt::Display for TkhdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{creation_time: {}, modification_time: {}, track_ID: {}, reserved_0: {}, \
             duration: {}, reserved_1: {:?}, layer: {}, alternate_group: {}, volume: {}, \
             reserved_2: {}, matrix: {:?}, width: {:?}, height: {:?}}}",
            self.creation_time,
            self.modification_time,
            self.track_id,
            self.reserved_0,
            self.duration,
            self.reserved_1,
            self.layer,
            self.alternate_group,
            self.volume,
            self.reserved_2,
            self.matrix,
            self.width,
            self.height
        )
    }
}

impl fmt::Display for MdhdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{creation_time: {}, modification_time: {}, timescale: {}, duration: {}, \
             pad: {}, language: {}, pre_defined: {}}}",
            self.creation_time,
            self.modification_time,
            self.timescale,
            self.duration,
            self.pad,
            Language(self.language),
            self.pre_defined
        )
    }
}

impl fmt::Display for HdlrData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{pre_defined: {}, handler_type: {:?}, reserved: {:?}, name: {:?}}}",
            self.pre_defined, self.handler_type, self.reserved, self.name
        )
    }
}

impl fmt::Display for StcoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{chunk_offsets_size: {}}}", self.entry_count)
    }
}

impl fmt::Display for Co64Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{large_chunk_offsets_size: {}}}", self.entry_count)
    }
}

impl fmt::Display for StszData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{samples_count: {}", self.samples_count)?;
        if let Some(size) = self.default_sample_size {
            write!(f, ", default_sample_size: {size}")?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for SampleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{header: {")?;
        fmt_header_fields(f, self.format.as_bytes(), self.header_size, self.size, None)?;
        write!(
            f,
            "}}, reserved: {:?}, data_reference_index: {}",
            self.reserved, self.data_reference_index
        )?;
        if let (Some(w), Some(h)) = (self.width, self.height) {
            write!(f, ", width: {w}, height: {h}")?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for StsdData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{entries: [")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(entry, f)?;
        }
        f.write_str("]}")
    }
}
