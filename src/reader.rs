//! Bounds-checked integer extraction over borrowed byte ranges.
//!
//! Every read either returns a value decoded from the front of the range or a
//! [`ShortRead`]; nothing here indexes past the end of the slice it is given.
//! Byte order is selected with the `byteorder` marker types, which convert
//! from the target order to the host order only when the two differ.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Not enough bytes were left to decode the requested value.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("short read: needed {needed} bytes, {available} available")]
pub struct ShortRead {
    pub needed: usize,
    pub available: usize,
}

fn front<const N: usize>(data: &[u8]) -> Result<&[u8], ShortRead> {
    data.get(..N).ok_or(ShortRead {
        needed: N,
        available: data.len(),
    })
}

pub fn read_u16<B: ByteOrder>(data: &[u8]) -> Result<u16, ShortRead> {
    front::<2>(data).map(B::read_u16)
}

pub fn read_u32<B: ByteOrder>(data: &[u8]) -> Result<u32, ShortRead> {
    front::<4>(data).map(B::read_u32)
}

pub fn read_u64<B: ByteOrder>(data: &[u8]) -> Result<u64, ShortRead> {
    front::<8>(data).map(B::read_u64)
}

/// Copy the first `N` bytes of `data` into an array.
pub fn read_array<const N: usize>(data: &[u8]) -> Result<[u8; N], ShortRead> {
    let mut out = [0u8; N];
    out.copy_from_slice(front::<N>(data)?);
    Ok(out)
}

/// Offset-addressed reads over a content range.
///
/// Typed box views describe their layout in byte offsets; `Fields` turns an
/// offset into a value or `None` when the field would cross the end of the
/// range.
#[derive(Clone, Copy, Debug)]
pub struct Fields<'a> {
    data: &'a [u8],
}

impl<'a> Fields<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Everything from `offset` to the end, or `None` if `offset` is past the end.
    pub fn tail(&self, offset: usize) -> Option<&'a [u8]> {
        self.data.get(offset..)
    }

    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub fn be_u16(&self, offset: usize) -> Option<u16> {
        read_u16::<BigEndian>(self.tail(offset)?).ok()
    }

    pub fn be_u32(&self, offset: usize) -> Option<u32> {
        read_u32::<BigEndian>(self.tail(offset)?).ok()
    }

    pub fn be_u64(&self, offset: usize) -> Option<u64> {
        read_u64::<BigEndian>(self.tail(offset)?).ok()
    }

    pub fn le_u16(&self, offset: usize) -> Option<u16> {
        read_u16::<LittleEndian>(self.tail(offset)?).ok()
    }

    pub fn le_u32(&self, offset: usize) -> Option<u32> {
        read_u32::<LittleEndian>(self.tail(offset)?).ok()
    }

    pub fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        read_array::<N>(self.tail(offset)?).ok()
    }

    /// `N` consecutive big-endian u32 values starting at `offset`.
    pub fn be_u32_array<const N: usize>(&self, offset: usize) -> Option<[u32; N]> {
        let mut out = [0u32; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.be_u32(offset + i * 4)?;
        }
        Some(out)
    }

    pub fn be_u16_array<const N: usize>(&self, offset: usize) -> Option<[u16; N]> {
        let mut out = [0u16; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.be_u16(offset + i * 2)?;
        }
        Some(out)
    }
}

/// Sequential reader that consumes the front of a range.
///
/// Used where the layout is a chain of variable-width fields, such as the box
/// header itself.
#[derive(Clone, Copy, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn read_u32<B: ByteOrder>(&mut self) -> Result<u32, ShortRead> {
        let v = read_u32::<B>(self.data)?;
        self.data = &self.data[4..];
        Ok(v)
    }

    pub fn read_u64<B: ByteOrder>(&mut self) -> Result<u64, ShortRead> {
        let v = read_u64::<B>(self.data)?;
        self.data = &self.data[8..];
        Ok(v)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ShortRead> {
        let v = read_array::<N>(self.data)?;
        self.data = &self.data[N..];
        Ok(v)
    }
}
