//! Tests for content sniffing

use super::test_utils;
use crate::format::signatures::{classify, sniff_prefix, FormatTag};

#[test]
fn test_classify_each_format() {
    assert_eq!(classify(&test_utils::png(1, 1, 8)), FormatTag::Png);
    assert_eq!(classify(&test_utils::jpeg(4, 4)), FormatTag::Jpeg);
    assert_eq!(classify(&test_utils::gif(4, 4, 0)), FormatTag::Gif);
    assert_eq!(classify(&test_utils::bmp(4, 4, 24, None)), FormatTag::Bmp);
    assert_eq!(classify(&test_utils::webp_vp8x(4, 4)), FormatTag::Webp);
}

#[test]
fn test_classify_accepts_gif87a() {
    let mut gif = test_utils::gif(4, 4, 0);
    gif[4] = b'7';
    assert_eq!(classify(&gif), FormatTag::Gif);
}

#[test]
fn test_classify_needs_twelve_bytes() {
    let png = test_utils::png(1, 1, 8);
    assert_eq!(classify(&png[..11]), FormatTag::Unknown);
    assert_eq!(classify(&png[..12]), FormatTag::Png);
    assert_eq!(classify(&[]), FormatTag::Unknown);
}

#[test]
fn test_classify_rejects_riff_that_is_not_webp() {
    let mut wave = b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec();
    assert_eq!(classify(&wave), FormatTag::Unknown);
    wave[8..12].copy_from_slice(b"WEBP");
    assert_eq!(classify(&wave), FormatTag::Webp);
}

#[test]
fn test_classify_text_is_unknown() {
    assert_eq!(classify(b"hello, this is plain text"), FormatTag::Unknown);
}

#[test]
fn test_sniff_prefix_requires_whole_signature() {
    // A bare RIFF header could still be WEBP, but the check cannot complete
    assert_eq!(sniff_prefix(b"RIFF\0\0\0\0"), None);
    assert_eq!(sniff_prefix(b"BM"), Some(FormatTag::Bmp));
    assert_eq!(sniff_prefix(&[0xFF, 0xD8]), None);
    assert_eq!(sniff_prefix(&[0xFF, 0xD8, 0xFF]), Some(FormatTag::Jpeg));
}

#[test]
fn test_format_codes_and_names() {
    for tag in [FormatTag::Png, FormatTag::Jpeg, FormatTag::Gif, FormatTag::Bmp, FormatTag::Webp, FormatTag::Unknown] {
        assert_eq!(FormatTag::from_code(tag.code()), tag);
    }
    assert_eq!(FormatTag::Jpeg.as_str(), "jpeg");
    assert_eq!(FormatTag::from_code(200), FormatTag::Unknown);
    assert_eq!(FormatTag::from_extension("JPEG"), FormatTag::Jpeg);
    assert_eq!(FormatTag::from_extension("txt"), FormatTag::Unknown);
}
