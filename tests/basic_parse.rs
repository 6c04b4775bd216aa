use hex_literal::hex;
use mp4view::parser::{ContentError, HeaderError, parse_box_header};
use mp4view::{BoxView, TypeTag, UserType};

fn make_box(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

fn make_large_box(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(&((16 + payload.len()) as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

#[test]
fn scenario_twelve_byte_test_box() {
    let data = hex!("0000000c 74657374 01020304");
    let view = BoxView::new(&data);

    let hdr = view.header().expect("header failed");
    assert_eq!(hdr.header_size, 8);
    assert_eq!(hdr.content_size, Some(4));
    assert_eq!(hdr.typ, TypeTag(*b"test"));
    assert_eq!(hdr.user_type, None);
    assert_eq!(view.content_data(), Ok(&[1u8, 2, 3, 4][..]));
}

#[test]
fn compact_size_round_trip() {
    for len in [0usize, 1, 7, 100] {
        let payload: Vec<u8> = (0..len as u8).collect();
        let data = make_box(b"free", &payload);
        let view = BoxView::new(&data);
        let hdr = view.header().unwrap();
        assert_eq!(hdr.header_size, 8);
        assert_eq!(hdr.content_size, Some(len as u64));
        assert_eq!(hdr.typ, TypeTag(*b"free"));
        assert_eq!(view.content_data().unwrap(), &payload[..]);
    }
}

#[test]
fn extended_size() {
    let data = make_large_box(b"mdat", &[9; 5]);
    let hdr = parse_box_header(&data).unwrap();
    assert_eq!(hdr.header_size, 16);
    assert_eq!(hdr.content_size, Some(5));
    assert_eq!(BoxView::new(&data).content_data().unwrap(), &[9; 5]);
}

#[test]
fn uuid_extended_type() {
    let user_type: [u8; 16] = hex!("a5d40b30e81411ddba2f0800200c9a66");
    let mut data = Vec::new();
    data.extend_from_slice(&(8u32 + 16 + 2).to_be_bytes());
    data.extend_from_slice(b"uuid");
    data.extend_from_slice(&user_type);
    data.extend_from_slice(&[0xaa, 0xbb]);

    let view = BoxView::new(&data);
    let hdr = view.header().unwrap();
    assert_eq!(hdr.header_size, 24);
    assert_eq!(hdr.content_size, Some(2));
    assert_eq!(hdr.user_type, Some(UserType(user_type)));
    assert_eq!(view.content_data().unwrap(), &[0xaa, 0xbb]);

    // largesize and uuid together
    let mut large = Vec::new();
    large.extend_from_slice(&1u32.to_be_bytes());
    large.extend_from_slice(b"uuid");
    large.extend_from_slice(&32u64.to_be_bytes());
    large.extend_from_slice(&user_type);
    let hdr = parse_box_header(&large).unwrap();
    assert_eq!(hdr.header_size, 32);
    assert_eq!(hdr.content_size, Some(0));
}

#[test]
fn size_to_end_of_buffer() {
    let mut data = hex!("00000000 6d646174").to_vec();
    data.extend_from_slice(&[1, 2, 3]);
    let view = BoxView::new(&data);
    assert_eq!(view.header().unwrap().content_size, None);
    assert_eq!(view.content_data().unwrap(), &[1, 2, 3]);

    data.extend_from_slice(&[4; 1000]);
    let view = BoxView::new(&data);
    assert_eq!(view.content_data().unwrap().len(), 1003);
}

#[test]
fn declared_size_smaller_than_header() {
    for size in 2u32..8 {
        let mut data = size.to_be_bytes().to_vec();
        data.extend_from_slice(b"free");
        assert_eq!(
            parse_box_header(&data),
            Err(HeaderError::InvalidSize {
                declared: u64::from(size),
                header_size: 8
            })
        );
    }
    // largesize below 16
    let mut data = hex!("00000001 66726565").to_vec();
    data.extend_from_slice(&15u64.to_be_bytes());
    assert_eq!(
        parse_box_header(&data),
        Err(HeaderError::InvalidSize {
            declared: 15,
            header_size: 16
        })
    );
    // uuid box declaring only the compact header
    let mut data = hex!("00000010 75756964").to_vec();
    data.extend_from_slice(&[0; 16]);
    assert!(matches!(
        parse_box_header(&data),
        Err(HeaderError::InvalidSize { declared: 16, .. })
    ));
}

#[test]
fn every_truncation_fails_cleanly() {
    let uuid_box = {
        let mut v = hex!("0000001c 75756964").to_vec();
        v.extend_from_slice(&[7; 16]);
        v.extend_from_slice(&[1, 2, 3, 4]);
        v
    };
    let fixtures = [
        make_box(b"test", &[1, 2, 3, 4]),
        make_large_box(b"mdat", &[5; 12]),
        uuid_box,
    ];

    for full in &fixtures {
        let declared_content = BoxView::new(full).header().unwrap().content_size;
        for cut in 1..full.len() {
            let data = &full[..full.len() - cut];
            let view = BoxView::new(data);
            match view.content_data() {
                Err(ContentError::NoHeader(_)) => assert!(view.header().is_err()),
                Err(ContentError::BoxDataSizeMismatch { declared, .. }) => {
                    assert_eq!(Some(declared), declared_content);
                }
                Ok(content) => panic!("truncated box parsed with {} content bytes", content.len()),
            }
        }
    }
}

#[test]
fn header_errors_are_specific() {
    assert_eq!(parse_box_header(&[]), Err(HeaderError::NoSizeData));
    assert_eq!(
        parse_box_header(&hex!("0000000c 7465")),
        Err(HeaderError::NoTagData)
    );
    assert_eq!(
        parse_box_header(&hex!("00000001 6d646174 0000")),
        Err(HeaderError::NoBigSizeData)
    );
    assert_eq!(
        parse_box_header(&hex!("00000020 75756964 0011")),
        Err(HeaderError::NoUuidData)
    );
}

#[test]
fn views_are_idempotent() {
    let data = make_box(b"test", &[1, 2, 3, 4]);
    let view = BoxView::new(&data);
    let first = (view.header(), view.content_data());
    for _ in 0..3 {
        assert_eq!((view.header(), view.content_data()), first);
    }
}
