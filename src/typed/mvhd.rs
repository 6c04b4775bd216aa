use super::{Slot, Validate, VersionedBlock, tagged_full_content};
use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::FullBoxView;

// creation_time, modification_time, timescale, duration
const BLOCK: VersionedBlock = VersionedBlock(&[Slot::Time, Slot::Time, Slot::Word, Slot::Time]);

// offsets past the versioned block
const RATE: usize = 0;
const VOLUME: usize = 4;
const RESERVED_0: usize = 6;
const RESERVED_1: usize = 8;
const MATRIX: usize = 16;
const PRE_DEFINED: usize = 52;
const NEXT_TRACK_ID: usize = 76;
const TAIL_LEN: usize = 80;

/// `mvhd`: movie-wide timing and presentation defaults.
#[derive(Debug, Clone, Copy)]
pub struct MovieHeaderBoxView<'a> {
    inner: FullBoxView<'a>,
}

impl<'a> MovieHeaderBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("mvhd");

    pub const fn new(inner: FullBoxView<'a>) -> Self {
        Self { inner }
    }

    fn fields(&self) -> Option<(u8, Fields<'a>)> {
        let (version, f) = tagged_full_content(&self.inner, Self::TAG)?;
        let required = BLOCK.len(version)? + TAIL_LEN;
        (f.len() >= required).then_some((version, f))
    }

    /// Fields after the versioned block, with the block length as base offset.
    fn tail(&self) -> Option<(Fields<'a>, usize)> {
        let (version, f) = self.fields()?;
        Some((f, BLOCK.len(version)?))
    }

    pub fn version(&self) -> Option<u8> {
        self.fields().map(|(v, _)| v)
    }

    pub fn creation_time(&self) -> Option<u64> {
        let (v, f) = self.fields()?;
        BLOCK.read(&f, v, 0)
    }

    pub fn modification_time(&self) -> Option<u64> {
        let (v, f) = self.fields()?;
        BLOCK.read(&f, v, 1)
    }

    pub fn timescale(&self) -> Option<u32> {
        let (v, f) = self.fields()?;
        BLOCK.read_word(&f, v, 2)
    }

    pub fn duration(&self) -> Option<u64> {
        let (v, f) = self.fields()?;
        BLOCK.read(&f, v, 3)
    }

    /// 16.16 fixed point, as integer and fraction halves.
    pub fn rate(&self) -> Option<[u16; 2]> {
        let (f, base) = self.tail()?;
        f.be_u16_array::<2>(base + RATE)
    }

    /// 8.8 fixed point, as integer and fraction bytes.
    pub fn volume(&self) -> Option<[u8; 2]> {
        let (f, base) = self.tail()?;
        f.array::<2>(base + VOLUME)
    }

    pub fn reserved_0(&self) -> Option<u16> {
        let (f, base) = self.tail()?;
        f.le_u16(base + RESERVED_0)
    }

    pub fn reserved_1(&self) -> Option<[u32; 2]> {
        let (f, base) = self.tail()?;
        f.be_u32_array::<2>(base + RESERVED_1)
    }

    pub fn matrix(&self) -> Option<[u32; 9]> {
        let (f, base) = self.tail()?;
        f.be_u32_array::<9>(base + MATRIX)
    }

    pub fn pre_defined(&self) -> Option<[u32; 6]> {
        let (f, base) = self.tail()?;
        let mut out = [0u32; 6];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f.le_u32(base + PRE_DEFINED + i * 4)?;
        }
        Some(out)
    }

    pub fn next_track_id(&self) -> Option<u32> {
        let (f, base) = self.tail()?;
        f.be_u32(base + NEXT_TRACK_ID)
    }
}

impl Validate for MovieHeaderBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}
