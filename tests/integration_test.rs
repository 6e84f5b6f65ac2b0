//! Integration tests for file inspection

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use imgprobe::{classify_bytes, inspect, BackendKind, ErrorKind, FormatTag, ImageProbe, InspectionError};

#[test]
fn test_small_png_is_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "image.png", &common::png(10, 20));

    let metadata = inspect(&path).unwrap();
    assert_eq!(metadata.format(), FormatTag::Png);
    assert_eq!((metadata.width(), metadata.height()), (10, 20));
    assert_eq!(metadata.bit_depth(), 8);
    assert!(metadata.well_formed());
}

#[test]
fn test_every_format_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = [
        ("a.png", common::png(31, 7), FormatTag::Png, (31, 7)),
        ("b.jpg", common::jpeg(1920, 1080), FormatTag::Jpeg, (1920, 1080)),
        ("c.gif", common::gif(64, 48), FormatTag::Gif, (64, 48)),
        ("d.bmp", common::bmp(5, -3), FormatTag::Bmp, (5, 3)),
        ("e.webp", common::webp_vp8l(250, 125), FormatTag::Webp, (250, 125)),
    ];

    for (name, bytes, format, dimensions) in fixtures {
        let path = common::write_fixture(dir.path(), name, &bytes);
        let metadata = inspect(&path).unwrap();
        assert_eq!(metadata.format(), format, "{}", name);
        assert_eq!((metadata.width(), metadata.height()), dimensions, "{}", name);
        assert!(metadata.well_formed(), "{}", name);
        assert_eq!(classify_bytes(&bytes), format, "{}", name);
    }
}

#[test]
fn test_zero_byte_file_is_too_small() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "empty.png", &[]);
    assert_eq!(
        inspect(&path).unwrap_err(),
        InspectionError::TooSmall { needed: 12, actual: 0 }
    );
}

#[test]
fn test_text_renamed_jpg_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "photo.jpg", b"this is a text file, honest");
    assert_eq!(inspect(&path).unwrap_err().kind(), ErrorKind::UnknownFormat);
}

#[test]
fn test_content_wins_over_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "actually_png.gif", &common::png(3, 4));
    assert_eq!(inspect(&path).unwrap().format(), FormatTag::Png);
}

#[test]
fn test_truncated_png_reports_size_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "cut.png", &common::png_through_ihdr(10, 20));

    let metadata = inspect(&path).unwrap();
    assert!(!metadata.well_formed());
    assert_eq!((metadata.width(), metadata.height()), (10, 20));
    assert_eq!(metadata.issue().map(|i| i.kind()), Some(ErrorKind::SizeMismatch));
}

#[test]
fn test_missing_file_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(inspect(dir.path().join("nope.png")).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(inspect(dir.path()).unwrap_err().kind(), ErrorKind::Unreadable);
}

#[test]
fn test_repeated_inspection_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "b.jpg", &common::jpeg(17, 19));
    let first = inspect(&path).unwrap();
    for _ in 0..5 {
        assert_eq!(inspect(&path).unwrap(), first);
    }
    assert_eq!(fs::read(&path).unwrap(), common::jpeg(17, 19));
}

#[test]
fn test_concurrent_in_process_inspection() {
    let dir = tempfile::tempdir().unwrap();
    let path = Arc::new(common::write_fixture(dir.path(), "c.gif", &common::gif(9, 9)));
    let probe = Arc::new(ImageProbe::in_process());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = Arc::clone(&path);
            let probe = Arc::clone(&probe);
            thread::spawn(move || probe.inspect(path.as_path()).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().width(), 9);
    }
}

#[test]
fn test_mock_backend_is_explicit() {
    let probe = ImageProbe::mock();
    assert_eq!(probe.backend_kind(), BackendKind::Mock);
    assert_eq!(ImageProbe::in_process().backend_kind(), BackendKind::InProcess);

    let dir = tempfile::tempdir().unwrap();
    let path = common::write_fixture(dir.path(), "x.webp", b"0123456789");
    let metadata = probe.inspect(&path).unwrap();
    assert_eq!(metadata.format(), FormatTag::Webp);
    assert_eq!(metadata.declared_byte_length(), 10);
    assert!(!metadata.well_formed());
}

#[test]
fn test_inspector_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::write_fixture(dir.path(), "settings.toml", b"[limits]\nmax_scan_bytes = 64\n");
    let probe = ImageProbe::from_config_file(&config).unwrap();

    assert_eq!(probe.backend_kind(), BackendKind::InProcess);
    assert_eq!(probe.config().limits.max_scan_bytes, 64);

    // Sniff prefix, IHDR and two chunk headers fit in 64 bytes
    let path = common::write_fixture(dir.path(), "a.png", &common::png(2, 2));
    assert_eq!(probe.inspect(&path).unwrap().width(), 2);
}

#[test]
fn test_resolve_library_artifact() {
    assert_eq!(imgprobe::resolve_library_artifact("linux", "x64").unwrap(), "imgprobe.so");
    assert_eq!(
        imgprobe::resolve_library_artifact("plan9", "x64").unwrap_err().kind(),
        ErrorKind::UnsupportedPlatform
    );
}
