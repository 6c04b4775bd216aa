use super::Validate;
use crate::boxes::{BoxHeader, TypeTag};
use crate::reader::Fields;
use crate::view::{BoxView, FullBoxView};

const ENTRY_COUNT: usize = 4;

const RESERVED: usize = 0;
const DATA_REFERENCE_INDEX: usize = 6;
const ENTRY_FIXED_LEN: usize = 8;
const VISUAL_WIDTH: usize = 24;
const VISUAL_HEIGHT: usize = 26;

const VISUAL_FORMATS: &[TypeTag] = &[
    TypeTag::from_ascii("avc1"),
    TypeTag::from_ascii("avc3"),
    TypeTag::from_ascii("hvc1"),
    TypeTag::from_ascii("hev1"),
    TypeTag::from_ascii("vp09"),
    TypeTag::from_ascii("av01"),
    TypeTag::from_ascii("mp4v"),
];

/// One entry of a sample description table: a box whose content starts with
/// six reserved bytes and a data reference index, followed by
/// codec-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleEntryBoxView<'a> {
    inner: BoxView<'a>,
}

impl<'a> SampleEntryBoxView<'a> {
    pub const fn new(inner: BoxView<'a>) -> Self {
        Self { inner }
    }

    fn fields(&self) -> Option<Fields<'a>> {
        let content = self.inner.content_data().ok()?;
        if content.len() < ENTRY_FIXED_LEN {
            return None;
        }
        Some(Fields::new(content))
    }

    pub fn header(&self) -> Option<BoxHeader> {
        self.fields()?;
        self.inner.header().ok()
    }

    /// The entry's type, which names the coding format.
    pub fn format(&self) -> Option<TypeTag> {
        self.header().map(|h| h.typ)
    }

    pub fn reserved(&self) -> Option<[u8; 6]> {
        self.fields()?.array::<6>(RESERVED)
    }

    pub fn data_reference_index(&self) -> Option<u16> {
        self.fields()?.be_u16(DATA_REFERENCE_INDEX)
    }

    /// Codec-specific bytes after the fixed fields.
    pub fn extra_data(&self) -> Option<&'a [u8]> {
        self.fields()?.tail(ENTRY_FIXED_LEN)
    }

    /// Width and height for visual coding formats.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        let format = self.format()?;
        if !VISUAL_FORMATS.contains(&format) {
            return None;
        }
        let f = self.fields()?;
        Some((f.be_u16(VISUAL_WIDTH)?, f.be_u16(VISUAL_HEIGHT)?))
    }
}

impl Validate for SampleEntryBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}

/// Outcome of [`SampleDescriptionBoxView::validate_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDescriptionStatus {
    Valid,
    InvalidType,
    /// Header, version/flags or content did not decode.
    InvalidBoxView,
    /// No room for the entry count.
    NoData,
    /// Content ended before the declared number of entries.
    NoNextSampleData,
    /// Bytes remain but do not hold an entry header.
    NoNextSampleBox,
    /// An entry runs to the end of input, so the next entry cannot be located.
    UnsizedSampleBox,
    InvalidSampleBox,
}

/// `stsd`: an entry count followed by that many size-prefixed sample entries.
#[derive(Debug, Clone, Copy)]
pub struct SampleDescriptionBoxView<'a> {
    inner: FullBoxView<'a>,
}

impl<'a> SampleDescriptionBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("stsd");

    pub const fn new(inner: FullBoxView<'a>) -> Self {
        Self { inner }
    }

    fn table(&self) -> Result<(u32, &'a [u8]), SampleDescriptionStatus> {
        use SampleDescriptionStatus::*;
        let header = self.inner.header().ok_or(InvalidBoxView)?;
        let data = self.inner.data().ok_or(InvalidBoxView)?;
        if header.header.typ != Self::TAG {
            return Err(InvalidType);
        }
        let count = Fields::new(data).be_u32(0).ok_or(NoData)?;
        Ok((count, &data[ENTRY_COUNT..]))
    }

    /// Walk every entry, reporting the first reason the table cannot be
    /// fully indexed.
    pub fn validate_status(&self) -> SampleDescriptionStatus {
        match self.try_entries() {
            Ok(_) => SampleDescriptionStatus::Valid,
            Err(status) => status,
        }
    }

    /// Validate the table once and hand back an iterator over its entries.
    pub fn try_entries(&self) -> Result<SampleEntries<'a>, SampleDescriptionStatus> {
        let (count, rest) = self.table()?;
        let entries = SampleEntries {
            rest,
            remaining: count,
        };
        let mut cursor = entries.clone();
        while cursor.remaining > 0 {
            cursor.advance()?;
        }
        Ok(entries)
    }

    pub fn entry_count(&self) -> Option<u32> {
        self.try_entries().ok().map(|e| e.remaining)
    }

    pub fn entries(&self) -> Option<SampleEntries<'a>> {
        self.try_entries().ok()
    }
}

impl Validate for SampleDescriptionBoxView<'_> {
    fn validate(&self) -> bool {
        self.validate_status() == SampleDescriptionStatus::Valid
    }
}

/// Iterator over the entries of a validated sample description table.
#[derive(Debug, Clone)]
pub struct SampleEntries<'a> {
    rest: &'a [u8],
    remaining: u32,
}

impl<'a> SampleEntries<'a> {
    /// Entries not yet yielded.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    fn advance(&mut self) -> Result<SampleEntryBoxView<'a>, SampleDescriptionStatus> {
        use SampleDescriptionStatus::*;
        if self.rest.is_empty() {
            return Err(NoNextSampleData);
        }
        let view = BoxView::new(self.rest);
        let header = view.header().map_err(|_| NoNextSampleBox)?;
        if header.content_size.is_none() {
            return Err(UnsizedSampleBox);
        }
        let entry = SampleEntryBoxView::new(view);
        if entry.is_not_valid() {
            return Err(InvalidSampleBox);
        }
        let len = view.box_bytes().map_err(|_| InvalidSampleBox)?.len();
        self.rest = &self.rest[len..];
        self.remaining -= 1;
        Ok(entry)
    }
}

impl<'a> Iterator for SampleEntries<'a> {
    type Item = SampleEntryBoxView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.advance() {
            Ok(entry) => Some(entry),
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, usize::try_from(self.remaining).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn stsd(data: &[u8]) -> SampleDescriptionBoxView<'_> {
        SampleDescriptionBoxView::new(FullBoxView::new(BoxView::new(data)))
    }

    #[test]
    fn iterates_sized_entries() {
        let data = hex!(
            "0000002c 73747364 00000000" // size 44, 'stsd', v0
            "00000002"                   // entry_count
            "00000010 6d703461"          // 'mp4a', 16 bytes
            "000000000000 0001"          // reserved, dri 1
            "0000000c 74783367"          // 'tx3g', 12 bytes, too short
            "00000000"
        );
        // the second entry lacks room for its fixed fields
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::InvalidSampleBox
        );

        let data = hex!(
            "00000034 73747364 00000000"
            "00000002"
            "00000010 6d703461 000000000000 0001"
            "00000014 74783367 000000000000 0002 aabbccdd"
        );
        let view = stsd(&data);
        assert!(view.is_valid());
        assert_eq!(view.entry_count(), Some(2));
        let entries: Vec<_> = view.entries().unwrap().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].format(), Some(TypeTag(*b"mp4a")));
        assert_eq!(entries[1].data_reference_index(), Some(2));
        assert_eq!(entries[1].extra_data(), Some(&hex!("aabbccdd")[..]));
        assert_eq!(entries[1].dimensions(), None);
    }

    #[test]
    fn unsized_entry_invalidates_table() {
        let data = hex!(
            "00000020 73747364 00000000"
            "00000002"
            "00000000 6d703461 000000000000 0001"
        );
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::UnsizedSampleBox
        );
        assert_eq!(stsd(&data).entries().map(|e| e.count()), None);
    }

    #[test]
    fn missing_entries() {
        let data = hex!("00000010 73747364 00000000 00000001");
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::NoNextSampleData
        );

        let data = hex!("00000012 73747364 00000000 00000001 0000");
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::NoNextSampleBox
        );

        let data = hex!("0000000e 73747364 00000000 0000");
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::NoData
        );

        let data = hex!("00000010 73747363 00000000 00000000");
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::InvalidType
        );

        let data = hex!("0000000a 73747364 0000");
        assert_eq!(
            stsd(&data).validate_status(),
            SampleDescriptionStatus::InvalidBoxView
        );
    }

    #[test]
    fn visual_entry_dimensions() {
        let data = hex!(
            "00000024 61766331"         // size 36, 'avc1'
            "000000000000 0001"         // reserved, dri
            "0000 0000 000000000000000000000000" // pre_defined, reserved, pre_defined[3]
            "0780 0438"                 // 1920 x 1080
        );
        let entry = SampleEntryBoxView::new(BoxView::new(&data));
        assert!(entry.is_valid());
        assert_eq!(entry.dimensions(), Some((1920, 1080)));
    }
}
