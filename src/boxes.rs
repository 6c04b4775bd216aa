use std::fmt;
use std::str::FromStr;

/// Four-byte box type identifier (`ftyp`, `moov`, ...). Also used for brands
/// and handler types, which share the encoding.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TypeTag(pub [u8; 4]);

/// A string that is not exactly four bytes long was used as a type tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("type tag must be exactly 4 bytes, got {0}")]
pub struct InvalidTypeTag(pub usize);

impl TypeTag {
    pub const UUID: TypeTag = TypeTag::from_ascii("uuid");

    /// Build a tag from a 4-byte string.
    ///
    /// Intended for constants: in a `const` context a wrong length fails the
    /// build. Use [`str::parse`] for runtime input.
    pub const fn from_ascii(s: &str) -> Self {
        let b = s.as_bytes();
        assert!(b.len() == 4, "type tag must be exactly 4 bytes");
        TypeTag([b[0], b[1], b[2], b[3]])
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// All four bytes are printable ASCII (space through `~`).
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|&c| is_print(c))
    }

    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if is_print(c) { c as char } else { '.' })
            .collect()
    }
}

impl FromStr for TypeTag {
    type Err = InvalidTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| InvalidTypeTag(s.len()))?;
        Ok(TypeTag(b))
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

pub(crate) fn is_print(c: u8) -> bool {
    (0x20..=0x7e).contains(&c)
}

/// 16-byte extended type carried by `uuid` boxes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UserType(pub [u8; 16]);

impl UserType {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// 24-bit FullBox flags. Byte 1 of the content is the most significant.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Flags(u32);

impl Flags {
    pub const fn from_bytes(b: [u8; 3]) -> Self {
        Flags(((b[0] as u32) << 16) | ((b[1] as u32) << 8) | (b[2] as u32))
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b{:024b}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    /// Bytes taken by the header: 8, 16, 24 or 32.
    pub header_size: u8,
    /// Bytes after the header. `None` means the box runs to the end of the
    /// enclosing buffer.
    pub content_size: Option<u64>,
    pub typ: TypeTag,
    /// Present only for `uuid` boxes.
    pub user_type: Option<UserType>,
}

impl BoxHeader {
    /// Key used to look the box up in a [`crate::registry::Registry`].
    pub fn key(&self) -> BoxKey {
        match self.user_type {
            Some(u) => BoxKey::Uuid(u.0),
            None => BoxKey::FourCC(self.typ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullBoxHeader {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: Flags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKey {
    FourCC(TypeTag),
    Uuid([u8; 16]),
}
