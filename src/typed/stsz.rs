use super::{Validate, table_len, tagged_full_content};
use crate::boxes::TypeTag;
use crate::reader::Fields;
use crate::view::FullBoxView;
use byteorder::{BigEndian, ByteOrder};

const SAMPLE_SIZE: usize = 0;
const SAMPLE_COUNT: usize = 4;
const ENTRIES: usize = 8;

/// `stsz`: either one size shared by every sample, or a per-sample size table.
#[derive(Debug, Clone, Copy)]
pub struct SampleSizeBoxView<'a> {
    inner: FullBoxView<'a>,
}

impl<'a> SampleSizeBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("stsz");

    pub const fn new(inner: FullBoxView<'a>) -> Self {
        Self { inner }
    }

    // The table is only present, and only checked, when the shared size is 0.
    fn fields(&self) -> Option<Fields<'a>> {
        let (_, f) = tagged_full_content(&self.inner, Self::TAG)?;
        let shared = f.be_u32(SAMPLE_SIZE)?;
        let count = f.be_u32(SAMPLE_COUNT)?;
        if shared != 0 {
            return Some(f);
        }
        let required = table_len(count, 4)?.checked_add(ENTRIES)?;
        (f.len() >= required).then_some(f)
    }

    /// The size shared by all samples; `None` when sizes are per-sample.
    pub fn default_sample_size(&self) -> Option<u32> {
        self.fields()?.be_u32(SAMPLE_SIZE).filter(|&s| s != 0)
    }

    pub fn samples_count(&self) -> Option<u32> {
        self.fields()?.be_u32(SAMPLE_COUNT)
    }

    /// Size of sample `index`. A non-zero shared size answers for every index.
    pub fn sample_size_at(&self, index: u32) -> Option<u32> {
        let f = self.fields()?;
        let shared = f.be_u32(SAMPLE_SIZE)?;
        if shared != 0 {
            return Some(shared);
        }
        if index >= f.be_u32(SAMPLE_COUNT)? {
            return None;
        }
        f.be_u32(ENTRIES + usize::try_from(index).ok()? * 4)
    }

    /// Per-sample size without validating the box or the index.
    ///
    /// # Safety
    ///
    /// The box must validate, its shared size must be 0, and `index` must be
    /// less than [`samples_count`](Self::samples_count).
    pub unsafe fn sample_size_at_unchecked(&self, index: u32) -> u32 {
        let content = self.inner.data().unwrap_or_default();
        let start = ENTRIES + index as usize * 4;
        // SAFETY: the caller guarantees `start + 4 <= content.len()`.
        BigEndian::read_u32(unsafe { content.get_unchecked(start..start + 4) })
    }
}

impl Validate for SampleSizeBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}
