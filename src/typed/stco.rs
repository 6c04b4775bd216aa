use super::{Validate, table_len, tagged_full_content};
use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::FullBoxView;
use byteorder::{BigEndian, ByteOrder};
use std::marker::PhantomData;

const ENTRY_COUNT: usize = 0;
const ENTRIES: usize = 4;

/// Entry layout of a chunk offset table.
pub trait OffsetEntry: 'static {
    const TAG: TypeTag;
    const WIDTH: usize;
    type Value: Copy;

    /// Decode one entry from exactly `WIDTH` bytes.
    fn read(bytes: &[u8]) -> Self::Value;
}

/// 32-bit offsets (`stco`).
#[derive(Debug, Clone, Copy)]
pub struct Stco;

/// 64-bit offsets (`co64`).
#[derive(Debug, Clone, Copy)]
pub struct Co64;

impl OffsetEntry for Stco {
    const TAG: TypeTag = TypeTag::from_ascii("stco");
    const WIDTH: usize = 4;
    type Value = u32;

    fn read(bytes: &[u8]) -> u32 {
        BigEndian::read_u32(bytes)
    }
}

impl OffsetEntry for Co64 {
    const TAG: TypeTag = TypeTag::from_ascii("co64");
    const WIDTH: usize = 8;
    type Value = u64;

    fn read(bytes: &[u8]) -> u64 {
        BigEndian::read_u64(bytes)
    }
}

/// Chunk offset table: an entry count followed by that many offsets.
#[derive(Debug, Clone, Copy)]
pub struct ChunkOffsetBox<'a, E> {
    inner: FullBoxView<'a>,
    _entry: PhantomData<E>,
}

pub type ChunkOffsetBoxView<'a> = ChunkOffsetBox<'a, Stco>;
pub type ChunkOffset64BoxView<'a> = ChunkOffsetBox<'a, Co64>;

impl<'a, E: OffsetEntry> ChunkOffsetBox<'a, E> {
    pub const TAG: TypeTag = E::TAG;

    pub const fn new(inner: FullBoxView<'a>) -> Self {
        Self {
            inner,
            _entry: PhantomData,
        }
    }

    fn fields(&self) -> Option<(u32, Fields<'a>)> {
        let (_, f) = tagged_full_content(&self.inner, E::TAG)?;
        let count = f.be_u32(ENTRY_COUNT)?;
        let required = table_len(count, E::WIDTH)?.checked_add(ENTRIES)?;
        (f.len() >= required).then_some((count, f))
    }

    pub fn entry_count(&self) -> Option<u32> {
        self.fields().map(|(count, _)| count)
    }

    /// Offset of chunk `index`, `None` when out of range or the box is invalid.
    pub fn chunk_offset(&self, index: u32) -> Option<E::Value> {
        let (count, f) = self.fields()?;
        if index >= count {
            return None;
        }
        let start = ENTRIES + usize::try_from(index).ok()? * E::WIDTH;
        let bytes = f.tail(start)?.get(..E::WIDTH)?;
        Some(E::read(bytes))
    }

    /// Offset of chunk `index` without validating the box or the index.
    ///
    /// # Safety
    ///
    /// The box must have passed [`Validate::validate`] and `index` must be
    /// less than [`entry_count`](Self::entry_count). Anything else reads
    /// outside the content range.
    pub unsafe fn chunk_offset_unchecked(&self, index: u32) -> E::Value {
        let content = self.inner.data().unwrap_or_default();
        let start = ENTRIES + index as usize * E::WIDTH;
        // SAFETY: the caller guarantees `start + WIDTH <= content.len()`.
        let bytes = unsafe { content.get_unchecked(start..start + E::WIDTH) };
        E::read(bytes)
    }

    pub fn offsets(&self) -> Option<impl ExactSizeIterator<Item = E::Value> + 'a> {
        let (count, f) = self.fields()?;
        let table = f.tail(ENTRIES)?.get(..table_len(count, E::WIDTH)?)?;
        Some(table.chunks_exact(E::WIDTH).map(E::read))
    }
}

impl<E: OffsetEntry> Validate for ChunkOffsetBox<'_, E> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}
