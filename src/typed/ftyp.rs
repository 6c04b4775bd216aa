use super::{Validate, tagged_content};
use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::BoxView;

const MAJOR_BRAND: usize = 0;
const MINOR_VERSION: usize = 4;
const COMPATIBLE_BRANDS: usize = 8;

/// `ftyp`: major brand, minor version, then a whole number of 4-byte
/// compatible brands.
#[derive(Debug, Clone, Copy)]
pub struct FileTypeBoxView<'a> {
    inner: BoxView<'a>,
}

impl<'a> FileTypeBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("ftyp");

    pub const fn new(inner: BoxView<'a>) -> Self {
        Self { inner }
    }

    fn fields(&self) -> Option<Fields<'a>> {
        let f = tagged_content(&self.inner, Self::TAG)?;
        let brands = f.len().checked_sub(COMPATIBLE_BRANDS)?;
        (brands % 4 == 0).then_some(f)
    }

    pub fn major_brand(&self) -> Option<TypeTag> {
        self.fields()?.array::<4>(MAJOR_BRAND).map(TypeTag)
    }

    pub fn minor_version(&self) -> Option<u32> {
        self.fields()?.be_u32(MINOR_VERSION)
    }

    pub fn compatible_brands(&self) -> Option<impl ExactSizeIterator<Item = TypeTag> + 'a> {
        let brands = self.fields()?.tail(COMPATIBLE_BRANDS)?;
        Some(
            brands
                .chunks_exact(4)
                .map(|c| TypeTag([c[0], c[1], c[2], c[3]])),
        )
    }
}

impl Validate for FileTypeBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}
