//! Fixture files shared by the integration tests

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `bytes` to `name` inside `dir`
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// 8-bit truecolor PNG: IHDR, one IDAT, IEND
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = png_through_ihdr(width, height);
    chunk(&mut buffer, b"IDAT", &[0x78, 0x9C, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00]);
    chunk(&mut buffer, b"IEND", &[]);
    buffer
}

/// PNG signature and IHDR only
pub fn png_through_ihdr(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
    chunk(&mut buffer, b"IHDR", &ihdr);
    buffer
}

fn chunk(buffer: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    buffer.extend_from_slice(&(data.len() as u32).to_be_bytes());
    buffer.extend_from_slice(kind);
    buffer.extend_from_slice(data);
    buffer.extend_from_slice(&[0, 0, 0, 0]);
}

/// Baseline JPEG with one frame header
pub fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut buffer = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    buffer.extend_from_slice(&height.to_be_bytes());
    buffer.extend_from_slice(&width.to_be_bytes());
    buffer.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    buffer.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x0C]);
    buffer.extend_from_slice(&[0u8; 10]);
    buffer.extend_from_slice(&[0x55, 0xAA, 0xFF, 0xD9]);
    buffer
}

/// GIF89a with an 8-bit color resolution
pub fn gif(width: u16, height: u16) -> Vec<u8> {
    let mut buffer = b"GIF89a".to_vec();
    buffer.extend_from_slice(&width.to_le_bytes());
    buffer.extend_from_slice(&height.to_le_bytes());
    buffer.extend_from_slice(&[0xF7, 0, 0, 0x3B]);
    buffer
}

/// 24-bit BMP with a BITMAPINFOHEADER
pub fn bmp(width: i32, height: i32) -> Vec<u8> {
    let mut buffer = b"BM".to_vec();
    buffer.extend_from_slice(&70u32.to_le_bytes());
    buffer.extend_from_slice(&[0, 0, 0, 0]);
    buffer.extend_from_slice(&54u32.to_le_bytes());
    buffer.extend_from_slice(&40u32.to_le_bytes());
    buffer.extend_from_slice(&width.to_le_bytes());
    buffer.extend_from_slice(&height.to_le_bytes());
    buffer.extend_from_slice(&1u16.to_le_bytes());
    buffer.extend_from_slice(&24u16.to_le_bytes());
    buffer.resize(70, 0);
    buffer
}

/// Lossless WEBP
pub fn webp_vp8l(width: u32, height: u32) -> Vec<u8> {
    let bits = (width - 1) | ((height - 1) << 14);
    let mut buffer = b"RIFF".to_vec();
    buffer.extend_from_slice(&24u32.to_le_bytes());
    buffer.extend_from_slice(b"WEBPVP8L");
    buffer.extend_from_slice(&11u32.to_le_bytes());
    buffer.push(0x2F);
    buffer.extend_from_slice(&bits.to_le_bytes());
    buffer.extend_from_slice(&[0u8; 7]);
    buffer
}
