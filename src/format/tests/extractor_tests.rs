//! Tests for header extraction through the reader

use std::io::Cursor;

use super::test_utils;
use crate::format::errors::InspectionError;
use crate::format::extractor::{extract, ScanLimits};
use crate::format::reader::ImageReader;
use crate::format::signatures::FormatTag;
use crate::io::ByteSource;

fn inspect(bytes: &[u8]) -> Result<crate::format::ImageMetadata, InspectionError> {
    ImageReader::default().read_bytes(bytes)
}

#[test]
fn test_png_dimensions_and_length() {
    let bytes = test_utils::png(10, 20, 8);
    let metadata = inspect(&bytes).unwrap();

    assert_eq!(metadata.format(), FormatTag::Png);
    assert_eq!((metadata.width(), metadata.height()), (10, 20));
    assert_eq!(metadata.bit_depth(), 8);
    assert_eq!(metadata.declared_byte_length(), bytes.len() as u64);
    assert!(metadata.well_formed());
    assert_eq!(metadata.issue(), None);
}

#[test]
fn test_png_first_chunk_must_be_ihdr() {
    let mut bytes = test_utils::png(10, 20, 8);
    bytes[12..16].copy_from_slice(b"IDAT");
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_png_shorter_than_ihdr_is_too_small() {
    let bytes = test_utils::png(10, 20, 8);
    let err = inspect(&bytes[..20]).unwrap_err();
    assert_eq!(err, InspectionError::TooSmall { needed: 33, actual: 20 });
}

#[test]
fn test_png_budget_exhaustion_stops_chunk_walk() {
    let mut bytes = test_utils::png_through_ihdr(64, 64, 8);
    for _ in 0..50 {
        test_utils::png_chunk(&mut bytes, b"tEXt", b"comment");
    }
    test_utils::png_chunk(&mut bytes, b"IEND", &[]);

    let limits = ScanLimits { max_scan_bytes: 100, ..ScanLimits::default() };
    let mut cursor = Cursor::new(bytes.clone());
    let mut source = ByteSource::new(&mut cursor, limits.max_scan_bytes).unwrap();
    let metadata = extract(&mut source, FormatTag::Png, &limits).unwrap();

    assert!(source.bytes_read() <= 100);
    assert_eq!(metadata.width(), 64);
    assert_eq!(metadata.declared_byte_length(), bytes.len() as u64);
}

#[test]
fn test_jpeg_budget_exhaustion_is_unreadable() {
    let tight = ImageReader::new(ScanLimits { max_scan_bytes: 16, ..ScanLimits::default() });
    match tight.read_bytes(&test_utils::jpeg(640, 480)) {
        Err(InspectionError::Unreadable(msg)) => assert!(msg.contains("read budget")),
        other => panic!("expected Unreadable, got {:?}", other),
    }
}

#[test]
fn test_jpeg_dimensions() {
    let metadata = inspect(&test_utils::jpeg(640, 480)).unwrap();
    assert_eq!(metadata.format(), FormatTag::Jpeg);
    assert_eq!((metadata.width(), metadata.height()), (640, 480));
    assert_eq!(metadata.bit_depth(), 8);
    assert!(metadata.well_formed());
}

#[test]
fn test_jpeg_progressive_frame_and_fill_bytes() {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xFF];
    test_utils::jpeg_segment(&mut bytes, 0xDB, &[0u8; 65]);
    test_utils::jpeg_sof(&mut bytes, 0xC2, 300, 200);
    test_utils::jpeg_segment(&mut bytes, 0xDA, &[0u8; 10]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);

    let metadata = inspect(&bytes).unwrap();
    assert_eq!((metadata.width(), metadata.height()), (300, 200));
}

#[test]
fn test_jpeg_dht_is_not_a_frame() {
    let mut bytes = vec![0xFF, 0xD8];
    test_utils::jpeg_segment(&mut bytes, 0xC4, &[0u8; 20]);
    test_utils::jpeg_sof(&mut bytes, 0xC1, 32, 16);
    test_utils::jpeg_segment(&mut bytes, 0xDA, &[0u8; 10]);

    let metadata = inspect(&bytes).unwrap();
    assert_eq!((metadata.width(), metadata.height()), (32, 16));
}

#[test]
fn test_jpeg_without_frame_is_malformed() {
    let mut bytes = vec![0xFF, 0xD8];
    test_utils::jpeg_segment(&mut bytes, 0xE0, &[0u8; 14]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_jpeg_frame_outside_scan_window_is_malformed() {
    let mut bytes = vec![0xFF, 0xD8];
    for _ in 0..4 {
        test_utils::jpeg_segment(&mut bytes, 0xE1, &[0u8; 1000]);
    }
    test_utils::jpeg_sof(&mut bytes, 0xC0, 8, 8);
    test_utils::jpeg_segment(&mut bytes, 0xDA, &[0u8; 10]);

    let narrow = ImageReader::new(ScanLimits { jpeg_scan_window: 2048, ..ScanLimits::default() });
    assert!(matches!(narrow.read_bytes(&bytes), Err(InspectionError::MalformedStructure(_))));
    assert_eq!(inspect(&bytes).unwrap().width(), 8);
}

#[test]
fn test_jpeg_lost_sync_is_malformed() {
    let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0x12, 0x34, 0x56, 0x78];
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_gif_dimensions_and_color_resolution() {
    let metadata = inspect(&test_utils::gif(320, 200, 0xF7)).unwrap();
    assert_eq!(metadata.format(), FormatTag::Gif);
    assert_eq!((metadata.width(), metadata.height()), (320, 200));
    assert_eq!(metadata.bit_depth(), 8);

    let metadata = inspect(&test_utils::gif(1, 1, 0x91)).unwrap();
    assert_eq!(metadata.bit_depth(), 2);
}

#[test]
fn test_gif_without_packed_byte_defaults_to_eight_bits() {
    let bytes = test_utils::gif(7, 9, 0);
    let metadata = inspect(&bytes[..10]).unwrap();
    assert_eq!((metadata.width(), metadata.height()), (7, 9));
    assert_eq!(metadata.bit_depth(), 8);
}

#[test]
fn test_bmp_info_header() {
    let bytes = test_utils::bmp(100, 50, 24, None);
    let metadata = inspect(&bytes).unwrap();
    assert_eq!(metadata.format(), FormatTag::Bmp);
    assert_eq!((metadata.width(), metadata.height()), (100, 50));
    assert_eq!(metadata.bit_depth(), 24);
    assert_eq!(metadata.declared_byte_length(), bytes.len() as u64);
    assert!(metadata.well_formed());
}

#[test]
fn test_bmp_top_down_height_is_absolute() {
    let metadata = inspect(&test_utils::bmp(16, -9, 32, None)).unwrap();
    assert_eq!((metadata.width(), metadata.height()), (16, 9));
}

#[test]
fn test_bmp_negative_width_is_malformed() {
    let bytes = test_utils::bmp(-16, 9, 32, None);
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_bmp_zero_file_size_uses_actual_length() {
    let bytes = test_utils::bmp(4, 4, 8, Some(0));
    let metadata = inspect(&bytes).unwrap();
    assert_eq!(metadata.declared_byte_length(), bytes.len() as u64);
    assert!(metadata.well_formed());
}

#[test]
fn test_bmp_core_header() {
    let metadata = inspect(&test_utils::bmp_core(12, 34, 8)).unwrap();
    assert_eq!((metadata.width(), metadata.height()), (12, 34));
    assert_eq!(metadata.bit_depth(), 8);
}

#[test]
fn test_bmp_invalid_bit_count_is_malformed() {
    for bit_count in [3, 255, 300] {
        let bytes = test_utils::bmp(4, 4, bit_count, None);
        match inspect(&bytes) {
            Err(InspectionError::MalformedStructure(msg)) => assert!(msg.contains(&bit_count.to_string())),
            other => panic!("bit count {} gave {:?}", bit_count, other),
        }
    }

    // Zero is only meaningful for info headers
    assert_eq!(inspect(&test_utils::bmp(4, 4, 0, None)).unwrap().bit_depth(), 0);
    assert!(matches!(
        inspect(&test_utils::bmp_core(4, 4, 0)),
        Err(InspectionError::MalformedStructure(_))
    ));
}

#[test]
fn test_bmp_unknown_dib_size_is_malformed() {
    let mut bytes = test_utils::bmp(4, 4, 24, None);
    bytes[14] = 99;
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_webp_all_bitstreams() {
    let lossy = inspect(&test_utils::webp_vp8(400, 300)).unwrap();
    assert_eq!((lossy.width(), lossy.height()), (400, 300));

    let lossless = inspect(&test_utils::webp_vp8l(1000, 1)).unwrap();
    assert_eq!((lossless.width(), lossless.height()), (1000, 1));

    let extended = inspect(&test_utils::webp_vp8x(16384, 5000)).unwrap();
    assert_eq!((extended.width(), extended.height()), (16384, 5000));

    for metadata in [lossy, lossless, extended] {
        assert_eq!(metadata.format(), FormatTag::Webp);
        assert_eq!(metadata.bit_depth(), 8);
        assert!(metadata.well_formed());
    }
}

#[test]
fn test_webp_vp8_scale_bits_are_masked() {
    let bytes = test_utils::webp_vp8(0x4000 | 200, 0xC000 | 100);
    let metadata = inspect(&bytes).unwrap();
    assert_eq!((metadata.width(), metadata.height()), (200, 100));
}

#[test]
fn test_webp_vp8_missing_start_code_is_malformed() {
    let mut bytes = test_utils::webp_vp8(10, 10);
    bytes[23] = 0;
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_webp_unknown_chunk_is_malformed() {
    let bytes = test_utils::webp(b"ALPH", &[0u8; 12]);
    assert!(matches!(inspect(&bytes), Err(InspectionError::MalformedStructure(_))));
}

#[test]
fn test_short_and_unknown_inputs() {
    assert_eq!(inspect(&[]).unwrap_err(), InspectionError::TooSmall { needed: 12, actual: 0 });
    assert_eq!(
        inspect(b"RIFF\0\0").unwrap_err(),
        InspectionError::TooSmall { needed: 12, actual: 6 }
    );
    assert_eq!(inspect(b"definitely not an image").unwrap_err(), InspectionError::UnknownFormat);
}

#[test]
fn test_inspection_is_idempotent() {
    let bytes = test_utils::jpeg(123, 45);
    assert_eq!(inspect(&bytes).unwrap(), inspect(&bytes).unwrap());
}
