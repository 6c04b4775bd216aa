//! Non-owning views over box bytes.
//!
//! A view is a borrowed slice; every accessor decodes from that slice again,
//! so views are `Copy`, hold no state, and cannot outlive the buffer they
//! were built from.

use crate::boxes::{BoxHeader, Flags, FullBoxHeader};
use crate::parser::{ContentError, HeaderError, content_range, parse_box_header};

/// A box starting at the front of a byte range.
///
/// The range may extend past the box; that tail is ignored by
/// [`BoxView::content_data`] but is where an unsized (size 0) box takes its
/// content from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxView<'a> {
    data: &'a [u8],
}

impl<'a> BoxView<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// The full range this view was built over.
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn header(&self) -> Result<BoxHeader, HeaderError> {
        parse_box_header(self.data)
    }

    /// The bytes after the header, bounded by the declared size.
    pub fn content_data(&self) -> Result<&'a [u8], ContentError> {
        let header = self.header().map_err(ContentError::NoHeader)?;
        content_range(self.data, &header)
    }

    /// Header and content together, i.e. the bytes this box occupies.
    pub fn box_bytes(&self) -> Result<&'a [u8], ContentError> {
        let header = self.header().map_err(ContentError::NoHeader)?;
        let content = content_range(self.data, &header)?;
        let len = usize::from(header.header_size) + content.len();
        Ok(&self.data[..len])
    }
}

/// A box whose content starts with a 1-byte version and 24-bit flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullBoxView<'a> {
    inner: BoxView<'a>,
}

impl<'a> FullBoxView<'a> {
    pub const fn new(inner: BoxView<'a>) -> Self {
        Self { inner }
    }

    pub const fn box_view(&self) -> BoxView<'a> {
        self.inner
    }

    pub fn header(&self) -> Option<FullBoxHeader> {
        Some(FullBoxHeader {
            header: self.inner.header().ok()?,
            version: self.version()?,
            flags: self.flags()?,
        })
    }

    /// Content after the version and flags.
    pub fn data(&self) -> Option<&'a [u8]> {
        self.version_and_flags().map(|(_, rest)| rest)
    }

    pub fn version(&self) -> Option<u8> {
        self.version_and_flags().map(|(vf, _)| vf[0])
    }

    pub fn flags(&self) -> Option<Flags> {
        self.version_and_flags()
            .map(|(vf, _)| Flags::from_bytes([vf[1], vf[2], vf[3]]))
    }

    fn version_and_flags(&self) -> Option<(&'a [u8; 4], &'a [u8])> {
        let content = self.inner.content_data().ok()?;
        content.split_first_chunk::<4>()
    }
}

impl<'a> From<BoxView<'a>> for FullBoxView<'a> {
    fn from(inner: BoxView<'a>) -> Self {
        Self::new(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::TypeTag;

    #[test]
    fn box_view_is_idempotent() {
        let data = [0, 0, 0, 12, b't', b'e', b's', b't', 1, 2, 3, 4, 0xee];
        let view = BoxView::new(&data);
        assert_eq!(view.header(), view.header());
        assert_eq!(view.content_data(), view.content_data());
        assert_eq!(view.content_data().unwrap(), &[1, 2, 3, 4]);
        assert_eq!(view.box_bytes().unwrap().len(), 12);
    }

    #[test]
    fn content_error_wraps_header_error() {
        let view = BoxView::new(&[0, 0]);
        assert_eq!(
            view.content_data(),
            Err(ContentError::NoHeader(HeaderError::NoSizeData))
        );
    }

    #[test]
    fn full_box_version_and_flags() {
        let data = [0, 0, 0, 14, b'm', b'v', b'h', b'd', 1, 0xab, 0xcd, 0xef, 9, 9];
        let full = FullBoxView::new(BoxView::new(&data));
        assert_eq!(full.version(), Some(1));
        assert_eq!(full.flags().map(|f| f.bits()), Some(0xabcdef));
        assert_eq!(full.data(), Some(&[9u8, 9][..]));
        let h = full.header().unwrap();
        assert_eq!(h.header.typ, TypeTag(*b"mvhd"));
        assert_eq!(h.version, 1);
    }

    #[test]
    fn full_box_needs_four_content_bytes() {
        let data = [0, 0, 0, 11, b'm', b'v', b'h', b'd', 1, 0, 0];
        let full = FullBoxView::from(BoxView::new(&data));
        assert_eq!(full.version(), None);
        assert_eq!(full.flags(), None);
        assert_eq!(full.data(), None);
        assert_eq!(full.header(), None);
    }
}
