#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use mp4view::registry::{BoxDecoder, BoxValue, Registry, StructuredData, default_registry};
    use mp4view::{BoxKey, BoxView, DumpError, TypeTag};

    fn full_box(typ: &[u8; 4], version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
        let mut v = ((12 + body.len()) as u32).to_be_bytes().to_vec();
        v.extend_from_slice(typ);
        v.push(version);
        v.extend_from_slice(&flags.to_be_bytes()[1..]);
        v.extend_from_slice(body);
        v
    }

    fn decode(data: &[u8]) -> Option<BoxValue> {
        default_registry()
            .decode(BoxView::new(data))
            .expect("decoder reported a missing field")
    }

    #[test]
    fn test_stsz_structured_decoding() {
        let data = full_box(
            b"stsz",
            0,
            0,
            &[
                0, 0, 0, 0, // sample_size = 0 (individual sizes)
                0, 0, 0, 3, // sample_count = 3
                0, 0, 3, 232, // size = 1000
                0, 0, 7, 208, // size = 2000
                0, 0, 11, 184, // size = 3000
            ],
        );

        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::SampleSize(stsz))) => {
                assert_eq!(stsz.version, 0);
                assert_eq!(stsz.flags, 0);
                assert_eq!(stsz.default_sample_size, None);
                assert_eq!(stsz.samples_count, 3);
                assert_eq!(stsz.sample_sizes, [1000, 2000, 3000]);
                assert_eq!(stsz.to_string(), "{samples_count: 3}");
            }
            other => panic!("Expected structured STSZ data, got {other:?}"),
        }
    }

    #[test]
    fn test_stsz_default_size() {
        let data = full_box(b"stsz", 0, 0, &hex!("00000400 00000064"));
        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::SampleSize(stsz))) => {
                assert_eq!(stsz.default_sample_size, Some(1024));
                assert_eq!(stsz.samples_count, 100);
                assert!(stsz.sample_sizes.is_empty());
                assert_eq!(
                    stsz.to_string(),
                    "{samples_count: 100, default_sample_size: 1024}"
                );
            }
            other => panic!("Expected structured STSZ data, got {other:?}"),
        }
    }

    #[test]
    fn test_stco_and_co64_decoding() {
        let stco = full_box(b"stco", 0, 0, &hex!("00000002 00000030 00001000"));
        match decode(&stco) {
            Some(BoxValue::Structured(StructuredData::ChunkOffset(d))) => {
                assert_eq!(d.entry_count, 2);
                assert_eq!(d.chunk_offsets, [0x30, 0x1000]);
                assert_eq!(d.to_string(), "{chunk_offsets_size: 2}");
            }
            other => panic!("Expected structured STCO data, got {other:?}"),
        }

        let co64 = full_box(b"co64", 0, 0, &hex!("00000001 0000000200000000"));
        match decode(&co64) {
            Some(BoxValue::Structured(StructuredData::ChunkOffset64(d))) => {
                assert_eq!(d.chunk_offsets, [0x2_0000_0000]);
                assert_eq!(d.to_string(), "{large_chunk_offsets_size: 1}");
            }
            other => panic!("Expected structured CO64 data, got {other:?}"),
        }
    }

    #[test]
    fn test_ftyp_decoding() {
        let data = hex!("00000018 66747970 69736f6d 00000200 69736f6d 6d703431");
        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::FileType(d))) => {
                assert_eq!(d.major_brand, "isom");
                assert_eq!(d.minor_version, 512);
                assert_eq!(d.compatible_brands, ["isom", "mp41"]);
                assert_eq!(
                    d.to_string(),
                    concat!(
                        r#"{major_brand: "isom", minor_version: 512, "#,
                        r#"compatible_brands: ["isom", "mp41"]}"#
                    )
                );
            }
            other => panic!("Expected structured FTYP data, got {other:?}"),
        }
    }

    #[test]
    fn test_mvhd_version_1_decoding() {
        let mut body = Vec::new();
        body.extend_from_slice(&0x1_0000_0000u64.to_be_bytes());
        body.extend_from_slice(&0x1_0000_0001u64.to_be_bytes());
        body.extend_from_slice(&600u32.to_be_bytes());
        body.extend_from_slice(&0x2_0000_0000u64.to_be_bytes());
        body.extend_from_slice(&hex!("00010000 0100"));
        body.resize(body.len() + 74, 0);
        let len = body.len();
        body[len - 4..].copy_from_slice(&2u32.to_be_bytes());
        let data = full_box(b"mvhd", 1, 0, &body);

        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::MovieHeader(d))) => {
                assert_eq!(d.version, 1);
                assert_eq!(d.creation_time, 0x1_0000_0000);
                assert_eq!(d.modification_time, 0x1_0000_0001);
                assert_eq!(d.timescale, 600);
                assert_eq!(d.duration, 0x2_0000_0000);
                assert_eq!(d.rate, [1, 0]);
                assert_eq!(d.volume, [1, 0]);
                assert_eq!(d.next_track_id, 2);
            }
            other => panic!("Expected structured MVHD data, got {other:?}"),
        }
    }

    #[test]
    fn test_tkhd_decoding() {
        let mut body = Vec::new();
        body.extend_from_slice(&hex!("00000001 00000002 00000007 00000000 00000bb8"));
        body.resize(body.len() + 52, 0);
        body.extend_from_slice(&hex!("05000000 02d00000"));
        let data = full_box(b"tkhd", 0, 7, &body);

        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::TrackHeader(d))) => {
                assert_eq!(d.flags, 7);
                assert_eq!(d.track_id, 7);
                assert_eq!(d.duration, 3000);
                assert_eq!(d.width, [1280, 0]);
                assert_eq!(d.height, [720, 0]);
            }
            other => panic!("Expected structured TKHD data, got {other:?}"),
        }
    }

    #[test]
    fn test_mdhd_decoding() {
        let body = hex!("00000000 00000000 0000ac44 00015888 15c7 0000");
        let data = full_box(b"mdhd", 0, 0, &body);
        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::MediaHeader(d))) => {
                assert_eq!(d.timescale, 44_100);
                assert_eq!(d.duration, 88_200);
                assert!(!d.pad);
                assert_eq!(d.language, [5, 14, 7]);
                assert_eq!(
                    d.to_string(),
                    "{creation_time: 0, modification_time: 0, timescale: 44100, \
                     duration: 88200, pad: false, language: \"eng\", pre_defined: 0}"
                );
            }
            other => panic!("Expected structured MDHD data, got {other:?}"),
        }
    }

    #[test]
    fn test_hdlr_decoding() {
        let mut body = vec![0; 4];
        body.extend_from_slice(b"soun");
        body.extend_from_slice(&[0; 12]);
        body.extend_from_slice(b"SoundHandler\0");
        let data = full_box(b"hdlr", 0, 0, &body);
        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::HandlerReference(d))) => {
                assert_eq!(d.handler_type, "soun");
                assert_eq!(d.name, "SoundHandler");
            }
            other => panic!("Expected structured HDLR data, got {other:?}"),
        }

        // no terminator: not a valid handler box
        body.pop();
        assert_eq!(decode(&full_box(b"hdlr", 0, 0, &body)), None);
    }

    #[test]
    fn test_stsd_decoding() {
        let data = hex!(
            "0000002c 73747364 00000000" // stsd v0
            "00000001"                   // entry_count
            "0000001c 6d703461"          // 'mp4a', 28 bytes
            "000000000000 0001"          // reserved, dri 1
            "00000000 00000000 00020010" // audio fields
        );
        match decode(&data) {
            Some(BoxValue::Structured(StructuredData::SampleDescription(d))) => {
                assert_eq!(d.entry_count, 1);
                assert_eq!(d.entries.len(), 1);
                assert_eq!(d.entries[0].format, "mp4a");
                assert_eq!(d.entries[0].data_reference_index, 1);
                assert_eq!(d.entries[0].width, None);
                assert_eq!(
                    d.to_string(),
                    "{entries: [{header: {type: \"mp4a\", size: 20}, \
                     reserved: [0, 0, 0, 0, 0, 0], data_reference_index: 1}]}"
                );
            }
            other => panic!("Expected structured STSD data, got {other:?}"),
        }
    }

    #[test]
    fn invalid_boxes_decode_to_none() {
        // truncated stco table
        let stco = full_box(b"stco", 0, 0, &hex!("00000003 00000001"));
        assert_eq!(decode(&stco), None);
        // no decoder registered
        assert_eq!(decode(&hex!("00000008 66726565")), None);
        // header does not parse
        assert_eq!(decode(&hex!("0000")), None);
    }

    struct TextDecoder;

    impl BoxDecoder for TextDecoder {
        fn decode(&self, view: BoxView<'_>) -> Result<Option<BoxValue>, DumpError> {
            let content = view.content_data().map_err(|_| DumpError::MissingField {
                view: "BoxView",
                field: "content",
            })?;
            Ok(Some(BoxValue::Text(format!("{} bytes", content.len()))))
        }
    }

    #[test]
    fn registry_invokes_custom_decoder() {
        let reg = Registry::new().with_decoder(
            BoxKey::FourCC(TypeTag(*b"test")),
            "test",
            Box::new(TextDecoder),
        );
        assert!(reg.contains(&BoxKey::FourCC(TypeTag(*b"test"))));

        let data = hex!("0000000c 74657374 01020304");
        assert_eq!(
            reg.decode(BoxView::new(&data)),
            Ok(Some(BoxValue::Text("4 bytes".into())))
        );

        // truncated content surfaces the decoder's error
        let short = hex!("0000000c 74657374 0102");
        assert_eq!(
            reg.decode(BoxView::new(&short)),
            Err(DumpError::MissingField {
                view: "BoxView",
                field: "content"
            })
        );
    }

    #[test]
    fn registry_keys_uuid_boxes_by_user_type() {
        let user_type = hex!("00112233445566778899aabbccddeeff");
        let reg = Registry::new().with_decoder(
            BoxKey::Uuid(user_type),
            "uuid",
            Box::new(TextDecoder),
        );

        let mut data = hex!("0000001a 75756964").to_vec();
        data.extend_from_slice(&user_type);
        data.extend_from_slice(&[7, 7]);
        assert_eq!(
            reg.decode(BoxView::new(&data)),
            Ok(Some(BoxValue::Text("2 bytes".into())))
        );

        // same box type, other user type
        data[8] = 0xff;
        assert_eq!(reg.decode(BoxView::new(&data)), Ok(None));
    }
}
