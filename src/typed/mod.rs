//! Typed views over specific box types.
//!
//! Every view follows the same contract: [`Validate::validate`] checks that
//! the header and content decode, that the type tag matches, and that the
//! content is long enough for every fixed field and every declared table
//! entry. Field accessors return `None` whenever the box does not validate
//! and otherwise read at a fixed or version-dependent offset. Validation is
//! repeated on each accessor call; views carry no cached state.

mod ftyp;
mod hdlr;
mod mdhd;
mod mvhd;
mod stco;
mod stsd;
mod stsz;
mod tkhd;

pub use ftyp::FileTypeBoxView;
pub use hdlr::HandlerBoxView;
pub use mdhd::{Language, MediaHeaderBoxView};
pub use mvhd::MovieHeaderBoxView;
pub use stco::{ChunkOffset64BoxView, ChunkOffsetBox, ChunkOffsetBoxView, Co64, OffsetEntry, Stco};
pub use stsd::{
    SampleDescriptionBoxView, SampleDescriptionStatus, SampleEntries, SampleEntryBoxView,
};
pub use stsz::SampleSizeBoxView;
pub use tkhd::TrackHeaderBoxView;

use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::{BoxView, FullBoxView};

/// Pass/fail shape check shared by all typed views.
pub trait Validate {
    fn validate(&self) -> bool;

    fn is_valid(&self) -> bool {
        self.validate()
    }

    fn is_not_valid(&self) -> bool {
        !self.is_valid()
    }
}

/// Content of a plain box, if it decodes and carries `tag`.
pub(crate) fn tagged_content<'a>(view: &BoxView<'a>, tag: TypeTag) -> Option<Fields<'a>> {
    let header = view.header().ok()?;
    if header.typ != tag {
        return None;
    }
    view.content_data().ok().map(Fields::new)
}

/// Version and post-flags content of a full box, if it decodes and carries `tag`.
pub(crate) fn tagged_full_content<'a>(
    view: &FullBoxView<'a>,
    tag: TypeTag,
) -> Option<(u8, Fields<'a>)> {
    let header = view.header()?;
    if header.header.typ != tag {
        return None;
    }
    Some((header.version, Fields::new(view.data()?)))
}

/// Width class of one field in a version-dependent block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// 32 bits in version 0, 64 bits in version 1.
    Time,
    /// 32 bits in both versions.
    Word,
}

/// The leading block of `mvhd`, `tkhd` and `mdhd`, whose time and duration
/// fields widen from 32 to 64 bits in version 1. Fields that follow the block
/// sit at `len(version)` plus a fixed offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VersionedBlock(pub &'static [Slot]);

impl VersionedBlock {
    fn slot_len(slot: Slot, version: u8) -> Option<usize> {
        match (slot, version) {
            (Slot::Word, 0 | 1) | (Slot::Time, 0) => Some(4),
            (Slot::Time, 1) => Some(8),
            _ => None,
        }
    }

    /// Byte length of the block, `None` for versions other than 0 and 1.
    pub fn len(&self, version: u8) -> Option<usize> {
        self.0
            .iter()
            .map(|&s| Self::slot_len(s, version))
            .sum::<Option<usize>>()
    }

    fn offset_of(&self, version: u8, index: usize) -> Option<usize> {
        self.0
            .get(..index)?
            .iter()
            .map(|&s| Self::slot_len(s, version))
            .sum::<Option<usize>>()
    }

    /// Read field `index` at the width its slot has under `version`.
    pub fn read(&self, fields: &Fields<'_>, version: u8, index: usize) -> Option<u64> {
        let offset = self.offset_of(version, index)?;
        match Self::slot_len(*self.0.get(index)?, version)? {
            8 => fields.be_u64(offset),
            _ => fields.be_u32(offset).map(u64::from),
        }
    }

    pub fn read_word(&self, fields: &Fields<'_>, version: u8, index: usize) -> Option<u32> {
        match self.0.get(index)? {
            Slot::Word => fields.be_u32(self.offset_of(version, index)?),
            Slot::Time => None,
        }
    }
}

/// Checked `count * width` for entry tables.
pub(crate) fn table_len(count: u32, width: usize) -> Option<usize> {
    usize::try_from(count).ok()?.checked_mul(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: VersionedBlock = VersionedBlock(&[Slot::Time, Slot::Time, Slot::Word, Slot::Time]);

    #[test]
    fn block_lengths_follow_version() {
        assert_eq!(BLOCK.len(0), Some(16));
        assert_eq!(BLOCK.len(1), Some(28));
        assert_eq!(BLOCK.len(2), None);
    }

    #[test]
    fn block_reads_at_version_offsets() {
        let mut v1 = Vec::new();
        v1.extend_from_slice(&1u64.to_be_bytes());
        v1.extend_from_slice(&2u64.to_be_bytes());
        v1.extend_from_slice(&3u32.to_be_bytes());
        v1.extend_from_slice(&(u64::from(u32::MAX) + 4).to_be_bytes());
        let f = Fields::new(&v1);
        assert_eq!(BLOCK.read(&f, 1, 0), Some(1));
        assert_eq!(BLOCK.read(&f, 1, 1), Some(2));
        assert_eq!(BLOCK.read_word(&f, 1, 2), Some(3));
        assert_eq!(BLOCK.read(&f, 1, 3), Some(u64::from(u32::MAX) + 4));
        assert_eq!(BLOCK.read_word(&f, 1, 0), None);
        assert_eq!(BLOCK.read(&f, 1, 4), None);
    }

    #[test]
    fn table_len_overflow() {
        assert_eq!(table_len(3, 4), Some(12));
        assert_eq!(table_len(u32::MAX, usize::MAX), None);
    }
}
