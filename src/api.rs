use crate::dump::{DumpError, dump_full_header, dump_header};
use crate::known_boxes::{BoxKind, KnownBox};
use crate::registry::{BoxValue, Registry, StructuredData};
use crate::view::FullBoxView;
use crate::walker::{Flow, WalkOptions, Walker};
use serde::Serialize;
use std::fmt::Write;

/// A JSON-serializable representation of a single box, as listed by the
/// flat dump.
#[derive(Debug, Clone, Serialize)]
pub struct FlatBox {
    /// Byte offset of this box in the walked buffer
    pub offset: u64,
    /// Total size of this box including header and content
    pub size: u64,
    /// Size of just the box header (8, 16, 24 or 32)
    pub header_size: u8,
    /// Nesting level, 0 for top-level boxes
    pub depth: usize,
    /// Four-character box type code (e.g., "ftyp", "moov")
    pub typ: String,
    /// User type of `uuid` boxes, as lowercase hex
    pub uuid: Option<String>,
    /// Version field for FullBox types
    pub version: Option<u8>,
    /// Flags field for FullBox types
    pub flags: Option<u32>,
    /// Box classification: "container", "full", "plain" or "unknown"
    pub kind: &'static str,
    /// Human-readable box type name (e.g., "File Type Box")
    pub full_name: &'static str,
    /// Header rendering, e.g. `{type: "moov", size: 1024}`
    pub header: String,
    /// Decoded text from a custom decoder
    pub decoded: Option<String>,
    /// Structured data if a registered decoder recognised the box
    pub structured_data: Option<StructuredData>,
}

impl FlatBox {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// `0x<start>-0x<end>`
    pub fn address(&self) -> String {
        format!("{:#x}-{:#x}", self.offset, self.end())
    }

    /// Text rendering of the decoded value, if any.
    pub fn value_text(&self) -> Option<String> {
        match (&self.structured_data, &self.decoded) {
            (Some(data), _) => Some(data.to_string()),
            (None, Some(text)) => Some(text.clone()),
            (None, None) => None,
        }
    }
}

/// Walk `data` and list every emitted box in depth-first order.
///
/// With `decode` set, boxes with a registered decoder carry its value. A
/// decoder error aborts the listing.
pub fn flat_boxes(
    data: &[u8],
    registry: &Registry,
    decode: bool,
    options: WalkOptions,
) -> Result<Vec<FlatBox>, DumpError> {
    let mut out = Vec::new();
    let mut failure = None;

    Walker::with_options(data, options).walk(|visit| {
        let header = visit.header;
        let known = KnownBox::lookup(header.typ);
        let kind = known.map_or(BoxKind::Plain, |k| k.kind);
        let full = FullBoxView::new(visit.view)
            .header()
            .filter(|_| kind == BoxKind::Full);

        let (mut decoded, mut structured_data) = (None, None);
        if decode {
            match registry.decode(visit.view) {
                Ok(Some(BoxValue::Structured(d))) => structured_data = Some(d),
                Ok(Some(BoxValue::Text(s))) => decoded = Some(s),
                Ok(None) => {}
                Err(e) => {
                    failure.get_or_insert(e);
                    return Flow::SkipChildren;
                }
            }
        }

        out.push(FlatBox {
            offset: visit.offset as u64,
            size: visit.len() as u64,
            header_size: header.header_size,
            depth: visit.depth,
            typ: header.typ.as_str_lossy(),
            uuid: header.user_type.map(|u| u.to_hex()),
            version: full.map(|f| f.version),
            flags: full.map(|f| f.flags.bits()),
            kind: match known.map(|k| k.kind) {
                Some(BoxKind::Container) => "container",
                Some(BoxKind::Full) => "full",
                Some(BoxKind::Plain) => "plain",
                None => "unknown",
            },
            full_name: known.map_or("Unknown Box", |k| k.full_name),
            header: match &full {
                Some(f) => dump_full_header(f),
                None => dump_header(&header),
            },
            decoded,
            structured_data,
        });
        Flow::Continue
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

/// One line per box: the address column padded to the widest address,
/// `|`, a `-` per nesting level, the header, then `,` and the decoded value
/// when there is one.
pub fn render_flat(boxes: &[FlatBox]) -> String {
    let width = boxes.iter().map(|b| b.address().len()).max().unwrap_or(0);
    let mut out = String::new();
    for b in boxes {
        let _ = write!(
            out,
            "{:width$} |{}{}",
            b.address(),
            "-".repeat(b.depth),
            b.header
        );
        if let Some(value) = b.value_text() {
            let _ = write!(out, ",{value}");
        }
        out.push('\n');
    }
    out
}

/// Tree rendering: one line per box, prefixed with `│`, `├` and `└`
/// according to each ancestor's and the box's own position among its
/// siblings. Boxes whose content is all zero bytes are marked ` (zeros)` and
/// not descended into.
pub fn render_tree(data: &[u8], options: WalkOptions) -> String {
    let mut out = String::new();
    let mut last_at_level: Vec<bool> = Vec::new();

    Walker::with_options(data, options).walk(|visit| {
        last_at_level.truncate(visit.depth);
        last_at_level.push(visit.is_last);

        let mut prefix: String = last_at_level[..visit.depth]
            .iter()
            .map(|&last| if last { ' ' } else { '│' })
            .collect();
        prefix.push(if visit.is_last { '└' } else { '├' });

        let content = visit.content();
        let zeros = !content.is_empty() && content.iter().all(|&b| b == 0);
        let _ = writeln!(
            out,
            "{prefix} {}{}",
            dump_header(&visit.header),
            if zeros { " (zeros)" } else { "" }
        );
        if zeros {
            Flow::SkipChildren
        } else {
            Flow::Continue
        }
    });
    out
}
