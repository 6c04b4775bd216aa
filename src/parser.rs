use crate::boxes::{BoxHeader, TypeTag, UserType};
use crate::reader::ByteReader;
use byteorder::BigEndian;

/// Why a box header could not be decoded.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("not enough data for box size")]
    NoSizeData,
    #[error("not enough data for box type")]
    NoTagData,
    #[error("not enough data for 64-bit box size")]
    NoBigSizeData,
    #[error("not enough data for uuid extended type")]
    NoUuidData,
    /// The declared size counts the header, so it can never be smaller.
    #[error("declared box size {declared} is smaller than its {header_size}-byte header")]
    InvalidSize { declared: u64, header_size: u8 },
}

/// Why the content range of a box could not be produced.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentError {
    #[error("box header: {0}")]
    NoHeader(#[source] HeaderError),
    #[error("box declares {declared} content bytes but only {available} are available")]
    BoxDataSizeMismatch { declared: u64, available: usize },
}

/// Decode an ISOBMFF box header from the front of `data`.
///
/// The returned `content_size` excludes the header. A 32-bit size of 0 means
/// the box runs to the end of the buffer (`content_size == None`), a size of 1
/// means a 64-bit size follows the type.
pub fn parse_box_header(data: &[u8]) -> Result<BoxHeader, HeaderError> {
    let mut r = ByteReader::new(data);

    let size32 = r
        .read_u32::<BigEndian>()
        .map_err(|_| HeaderError::NoSizeData)?;
    let typ = TypeTag(r.read_array::<4>().map_err(|_| HeaderError::NoTagData)?);
    let mut header_size: u8 = 8;

    let declared = match size32 {
        0 => None,
        1 => {
            let large = r
                .read_u64::<BigEndian>()
                .map_err(|_| HeaderError::NoBigSizeData)?;
            header_size += 8;
            Some(large)
        }
        n => Some(u64::from(n)),
    };

    let user_type = if typ == TypeTag::UUID {
        let u = r.read_array::<16>().map_err(|_| HeaderError::NoUuidData)?;
        header_size += 16;
        Some(UserType(u))
    } else {
        None
    };

    let content_size = match declared {
        Some(declared) => match declared.checked_sub(u64::from(header_size)) {
            Some(content) => Some(content),
            None => {
                return Err(HeaderError::InvalidSize {
                    declared,
                    header_size,
                });
            }
        },
        None => None,
    };

    Ok(BoxHeader {
        header_size,
        content_size,
        typ,
        user_type,
    })
}

/// Bound the content of a box whose header has already been decoded.
///
/// `data` starts at the box header. Sized boxes are cut to exactly their
/// declared content; unsized boxes take everything after the header.
pub fn content_range<'a>(data: &'a [u8], header: &BoxHeader) -> Result<&'a [u8], ContentError> {
    let after = data
        .get(usize::from(header.header_size)..)
        .unwrap_or_default();
    match header.content_size {
        None => Ok(after),
        Some(declared) => usize::try_from(declared)
            .ok()
            .and_then(|n| after.get(..n))
            .ok_or(ContentError::BoxDataSizeMismatch {
                declared,
                available: after.len(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_header() {
        let data = [0, 0, 0, 12, b't', b'e', b's', b't', 1, 2, 3, 4];
        let h = parse_box_header(&data).unwrap();
        assert_eq!(h.header_size, 8);
        assert_eq!(h.content_size, Some(4));
        assert_eq!(h.typ, TypeTag(*b"test"));
        assert_eq!(h.user_type, None);
        assert_eq!(content_range(&data, &h).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn header_errors_in_order() {
        assert_eq!(parse_box_header(&[0, 0, 0]), Err(HeaderError::NoSizeData));
        assert_eq!(
            parse_box_header(&[0, 0, 0, 8, b'f', b'r']),
            Err(HeaderError::NoTagData)
        );
        assert_eq!(
            parse_box_header(&[0, 0, 0, 1, b'f', b'r', b'e', b'e', 0, 0]),
            Err(HeaderError::NoBigSizeData)
        );
        assert_eq!(
            parse_box_header(&[0, 0, 0, 0, b'u', b'u', b'i', b'd', 1, 2, 3]),
            Err(HeaderError::NoUuidData)
        );
        assert_eq!(
            parse_box_header(&[0, 0, 0, 7, b'f', b'r', b'e', b'e']),
            Err(HeaderError::InvalidSize {
                declared: 7,
                header_size: 8
            })
        );
    }

    #[test]
    fn uuid_size_must_cover_extended_type() {
        let mut data = vec![0, 0, 0, 20];
        data.extend_from_slice(b"uuid");
        data.extend_from_slice(&[0xab; 16]);
        assert_eq!(
            parse_box_header(&data),
            Err(HeaderError::InvalidSize {
                declared: 20,
                header_size: 24
            })
        );
    }

    #[test]
    fn content_mismatch() {
        let data = [0, 0, 0, 16, b'f', b'r', b'e', b'e', 1, 2];
        let h = parse_box_header(&data).unwrap();
        assert_eq!(
            content_range(&data, &h),
            Err(ContentError::BoxDataSizeMismatch {
                declared: 8,
                available: 2
            })
        );
    }

    #[test]
    fn huge_large_size_does_not_overflow() {
        let mut data = vec![0, 0, 0, 1];
        data.extend_from_slice(b"mdat");
        data.extend_from_slice(&u64::MAX.to_be_bytes());
        let h = parse_box_header(&data).unwrap();
        assert_eq!(h.content_size, Some(u64::MAX - 16));
        assert!(matches!(
            content_range(&data, &h),
            Err(ContentError::BoxDataSizeMismatch { .. })
        ));
    }
}
