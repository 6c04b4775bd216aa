use super::{Slot, Validate, VersionedBlock, tagged_full_content};
use crate::boxes::{TypeTag, is_print};
use crate::reader::Fields;
use crate::view::FullBoxView;
use std::fmt;

// creation_time, modification_time, timescale, duration
const BLOCK: VersionedBlock = VersionedBlock(&[Slot::Time, Slot::Time, Slot::Word, Slot::Time]);

const LANGUAGE: usize = 0;
const PRE_DEFINED: usize = 2;
const TAIL_LEN: usize = 4;

/// ISO-639-2/T language code packed as three 5-bit values, each the letter's
/// ASCII code minus 0x60.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language(pub [u8; 3]);

impl Language {
    /// Unpack from the 16-bit field; the top bit is padding and is ignored.
    pub const fn from_packed(packed: u16) -> Self {
        Language([
            ((packed >> 10) & 0x1f) as u8,
            ((packed >> 5) & 0x1f) as u8,
            (packed & 0x1f) as u8,
        ])
    }

    /// The three letters, when every code is non-zero and maps to a
    /// printable character.
    pub fn as_letters(&self) -> Option<[char; 3]> {
        if self.0.contains(&0) {
            return None;
        }
        let letters = self.0.map(|c| c + 0x60);
        letters
            .iter()
            .all(|&c| is_print(c))
            .then(|| letters.map(char::from))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_letters() {
            Some([a, b, c]) => write!(f, "\"{a}{b}{c}\""),
            None => write!(f, "{:?}", self.0),
        }
    }
}

/// `mdhd`: media timescale, duration and language of a track.
#[derive(Debug, Clone, Copy)]
pub struct MediaHeaderBoxView<'a> {
    inner: FullBoxView<'a>,
}

impl<'a> MediaHeaderBoxView<'a> {
    pub const TAG: TypeTag = TypeTag::from_ascii("mdhd");

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

    /// The pad bit preceding the language codes.
    pub fn pad(&self) -> Option<bool> {
        let (f, base) = self.tail()?;
        f.u8_at(base + LANGUAGE).map(|b| b & 0x80 != 0)
    }

    pub fn language(&self) -> Option<Language> {
        let (f, base) = self.tail()?;
        f.be_u16(base + LANGUAGE).map(Language::from_packed)
    }

    pub fn pre_defined(&self) -> Option<u16> {
        let (f, base) = self.tail()?;
        f.be_u16(base + PRE_DEFINED)
    }
}

impl Validate for MediaHeaderBoxView<'_> {
    fn validate(&self) -> bool {
        self.fields().is_some()
    }
}
