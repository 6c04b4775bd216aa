use super::{Validate, tagged_full_content};
use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::FullBoxView;
use std::borrow::Cow;

const PRE_DEFINED: usize = 0;
const HANDLER_TYPE: usize = 4;
const RESERVED: usize = 8;
const NAME: usize = 20;

/// `hdlr`: declares the media type of a track (`vide`, `soun`, ...) and a
/// NUL-terminated UTF-8 name.
#[derive(Debug, Clone, Copy)]
pub struct HandlerBoxView<'a> {
    inner: FullBoxView<'a>,
}

impl<'a> HandlerBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("hdlr");

    pub const fn new(inner: FullBoxView<'a>) -> Self {
        Self { inner }
    }

    fn fields(&self) -> Option<Fields<'a>> {
        let (_, f) = tagged_full_content(&self.inner, Self::TAG)?;
        f.tail(NAME)?.contains(&0).then_some(f)
    }

    pub fn pre_defined(&self) -> Option<u32> {
        self.fields()?.be_u32(PRE_DEFINED)
    }

    pub fn handler_type(&self) -> Option<TypeTag> {
        self.fields()?.array::<4>(HANDLER_TYPE).map(TypeTag)
    }

    pub fn reserved(&self) -> Option<[u32; 3]> {
        self.fields()?.be_u32_array::<3>(RESERVED)
    }

    /// Name bytes up to, not including, the terminator.
    pub fn name(&self) -> Option<&'a [u8]> {
        let tail = self.fields()?.tail(NAME)?;
        let end = tail.iter().position(|&b| b == 0)?;
        Some(&tail[..end])
    }

    pub fn name_lossy(&self) -> Option<Cow<'a, str>> {
        self.name().map(String::from_utf8_lossy)
    }
}

impl Validate for HandlerBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::BoxView;
    use hex_literal::hex;

    #[test]
    fn reads_handler_and_name() {
        let data = hex!(
            "00000028 68646c72 00000000" // size 40, 'hdlr', v0
            "00000000 76696465"          // pre_defined, 'vide'
            "00000000 00000000 00000000" // reserved
            "566964656f00 ffff"          // "Video\0" + trailing bytes
        );
        let hdlr = HandlerBoxView::new(FullBoxView::new(BoxView::new(&data)));
        assert!(hdlr.is_valid());
        assert_eq!(hdlr.handler_type(), Some(TypeTag(*b"vide")));
        assert_eq!(hdlr.name(), Some(&b"Video"[..]));
        assert_eq!(hdlr.name_lossy().as_deref(), Some("Video"));
    }

    #[test]
    fn unterminated_name_is_invalid() {
        let data = hex!(
            "00000023 68646c72 00000000"
            "00000000 76696465"
            "00000000 00000000 00000000"
            "566964"
        );
        let hdlr = HandlerBoxView::new(FullBoxView::new(BoxView::new(&data)));
        assert!(hdlr.is_not_valid());
        assert_eq!(hdlr.handler_type(), None);
    }
}
