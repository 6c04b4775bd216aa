use super::{Slot, Validate, VersionedBlock, tagged_full_content};
use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::FullBoxView;

// creation_time, modification_time, track_ID, reserved, duration
const BLOCK: VersionedBlock = VersionedBlock(&[
    Slot::Time,
    Slot::Time,
    Slot::Word,
    Slot::Word,
    Slot::Time,
]);

const RESERVED_1: usize = 0;
const LAYER: usize = 8;
const ALTERNATE_GROUP: usize = 10;
const VOLUME: usize = 12;
const RESERVED_2: usize = 14;
const MATRIX: usize = 16;
const WIDTH: usize = 52;
const HEIGHT: usize = 56;
const TAIL_LEN: usize = 60;

/// `tkhd`: per-track identity, timing and presentation geometry.
#[derive(Debug, Clone, Copy)]
pub struct TrackHeaderBoxView<'a> {
    inner: FullBoxView<'a>,
}

impl<'a> TrackHeaderBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("tkhd");

    pub const fn new(inner: FullBoxView<'a>) -> Self {
        Self { inner }
    }

    fn fields(&self) -> Option<(u8, Fields<'a>)> {
        let (version, f) = tagged_full_content(&self.inner, Self::TAG)?;
        let required = BLOCK.len(version)? + TAIL_LEN;
        (f.len() >= required).then_some((version, f))
    }

    fn tail(&self) -> Option<(Fields<'a>, usize)> {
        let (version, f) = self.fields()?;
        Some((f, BLOCK.len(version)?))
    }

    pub fn version(&self) -> Option<u8> {
        self.fields().map(|(v, _)| v)
    }

    /// Track flags (enabled, in movie, in preview, ...).
    pub fn flags(&self) -> Option<u32> {
        self.fields()?;
        self.inner.flags().map(|f| f.bits())
    }

    pub fn creation_time(&self) -> Option<u64> {
        let (v, f) = self.fields()?;
        BLOCK.read(&f, v, 0)
    }

    pub fn modification_time(&self) -> Option<u64> {
        let (v, f) = self.fields()?;
        BLOCK.read(&f, v, 1)
    }

    pub fn track_id(&self) -> Option<u32> {
        let (v, f) = self.fields()?;
        BLOCK.read_word(&f, v, 2)
    }

    pub fn reserved_0(&self) -> Option<u32> {
        let (v, f) = self.fields()?;
        BLOCK.read_word(&f, v, 3)
    }

    pub fn duration(&self) -> Option<u64> {
        let (v, f) = self.fields()?;
        BLOCK.read(&f, v, 4)
    }

    pub fn reserved_1(&self) -> Option<[u32; 2]> {
        let (f, base) = self.tail()?;
        f.be_u32_array::<2>(base + RESERVED_1)
    }

    pub fn layer(&self) -> Option<u16> {
        let (f, base) = self.tail()?;
        f.be_u16(base + LAYER)
    }

    pub fn alternate_group(&self) -> Option<u16> {
        let (f, base) = self.tail()?;
        f.be_u16(base + ALTERNATE_GROUP)
    }

    pub fn volume(&self) -> Option<u16> {
        let (f, base) = self.tail()?;
        f.be_u16(base + VOLUME)
    }

    pub fn reserved_2(&self) -> Option<u16> {
        let (f, base) = self.tail()?;
        f.be_u16(base + RESERVED_2)
    }

    pub fn matrix(&self) -> Option<[u32; 9]> {
        let (f, base) = self.tail()?;
        f.be_u32_array::<9>(base + MATRIX)
    }

    /// 16.16 fixed point, as integer and fraction halves.
    pub fn width(&self) -> Option<[u16; 2]> {
        let (f, base) = self.tail()?;
        f.be_u16_array::<2>(base + WIDTH)
    }

    /// 16.16 fixed point, as integer and fraction halves.
    pub fn height(&self) -> Option<[u16; 2]> {
        let (f, base) = self.tail()?;
        f.be_u16_array::<2>(base + HEIGHT)
    }
}

impl Validate for TrackHeaderBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}
