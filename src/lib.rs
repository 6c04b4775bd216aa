//! Zero-copy views over ISO/IEC 14496-12 (MP4) box structures.
//!
//! Box headers are decoded straight from a borrowed buffer; [`BoxView`] and
//! the typed views in [`typed`] re-check bounds on every access and never
//! copy payload bytes. [`walker::Walker`] traverses nested boxes with an
//! explicit stack.

pub mod api;
pub mod boxes;
pub mod dump;
pub mod known_boxes;
pub mod logger;
pub mod parser;
pub mod reader;
pub mod registry;
pub mod typed;
pub mod util;
pub mod view;
pub mod walker;

pub use api::{FlatBox, flat_boxes, render_flat};
pub use boxes::{BoxHeader, BoxKey, Flags, FullBoxHeader, TypeTag, UserType};
pub use dump::DumpError;
pub use parser::{ContentError, HeaderError, parse_box_header};
pub use registry::{BoxDecoder, BoxValue, Registry, StructuredData, default_registry};
pub use view::{BoxView, FullBoxView};
pub use walker::{BoxVisit, Flow, WalkOptions, Walker};
