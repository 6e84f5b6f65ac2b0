//! Container format constants
//!
//! Magic numbers, offsets and minimum header sizes used by the sniffer and
//! the per-format parsers.

/// Number of leading bytes the sniffer needs (RIFF size + "WEBP")
pub const SNIFF_LEN: usize = 12;

/// Largest width or height considered plausible
pub const MAX_DIMENSION: u32 = 65535;

/// Signature byte sequences
pub mod signatures {
    pub const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    pub const JPEG: [u8; 3] = [0xFF, 0xD8, 0xFF];
    pub const GIF87A: &[u8; 6] = b"GIF87a";
    pub const GIF89A: &[u8; 6] = b"GIF89a";
    pub const BMP: &[u8; 2] = b"BM";
    pub const RIFF: &[u8; 4] = b"RIFF";
    pub const WEBP: &[u8; 4] = b"WEBP";
}

/// PNG layout
pub mod png {
    /// Signature (8) + IHDR length/type (8) + IHDR data (13) + CRC (4)
    pub const MIN_HEADER: u64 = 33;
    pub const IHDR_DATA_LEN: u32 = 13;
    /// Length + type + CRC around each chunk payload
    pub const CHUNK_OVERHEAD: u64 = 12;
    pub const IHDR: &[u8; 4] = b"IHDR";
    pub const IEND: &[u8; 4] = b"IEND";
    pub const WIDTH_OFFSET: usize = 16;
    pub const HEIGHT_OFFSET: usize = 20;
    pub const BIT_DEPTH_OFFSET: usize = 24;
}

/// JPEG markers
pub mod jpeg {
    pub const MIN_HEADER: u64 = 4;
    pub const MARKER_PREFIX: u8 = 0xFF;
    pub const TEM: u8 = 0x01;
    pub const RST0: u8 = 0xD0;
    pub const SOI: u8 = 0xD8;
    pub const EOI: u8 = 0xD9;
    pub const SOS: u8 = 0xDA;
    pub const SOF_FIRST: u8 = 0xC0;
    pub const SOF_LAST: u8 = 0xCF;
    /// DHT, JPG and DAC share the SOF range but are not frame headers
    pub const DHT: u8 = 0xC4;
    pub const JPG: u8 = 0xC8;
    pub const DAC: u8 = 0xCC;
    /// Length (2) + precision (1) + height (2) + width (2) + components (1)
    pub const MIN_SOF_LENGTH: u16 = 8;
}

/// GIF layout
pub mod gif {
    pub const MIN_HEADER: u64 = 10;
    pub const WIDTH_OFFSET: usize = 6;
    pub const HEIGHT_OFFSET: usize = 8;
    pub const PACKED_OFFSET: usize = 10;
}

/// BMP layout
pub mod bmp {
    /// File header (14) + BITMAPCOREHEADER (12)
    pub const MIN_HEADER: u64 = 26;
    /// File header (14) + the fields of BITMAPINFOHEADER we read (16)
    pub const MIN_INFO_HEADER: u64 = 30;
    pub const FILE_SIZE_OFFSET: usize = 2;
    pub const DIB_SIZE_OFFSET: usize = 14;
    pub const WIDTH_OFFSET: usize = 18;
    pub const CORE_HEIGHT_OFFSET: usize = 20;
    pub const CORE_BIT_COUNT_OFFSET: usize = 24;
    pub const INFO_HEIGHT_OFFSET: usize = 22;
    pub const INFO_BIT_COUNT_OFFSET: usize = 28;
    pub const CORE_HEADER_SIZE: u32 = 12;
    /// OS/2 v2 short form, INFO, V2, V3, OS/2 v2, V4, V5
    pub const INFO_HEADER_SIZES: [u32; 7] = [16, 40, 52, 56, 64, 108, 124];
    /// Bits per pixel a BMP may declare
    pub const BIT_COUNTS: [u16; 8] = [0, 1, 2, 4, 8, 16, 24, 32];
}

/// WEBP layout
pub mod webp {
    /// RIFF header (12) + first chunk header (8)
    pub const MIN_HEADER: u64 = 20;
    pub const RIFF_SIZE_OFFSET: usize = 4;
    pub const CHUNK_OFFSET: usize = 12;
    pub const RIFF_HEADER_LEN: u64 = 8;
    pub const VP8: &[u8; 4] = b"VP8 ";
    pub const VP8L: &[u8; 4] = b"VP8L";
    pub const VP8X: &[u8; 4] = b"VP8X";
    pub const VP8_MIN: u64 = 30;
    pub const VP8L_MIN: u64 = 25;
    pub const VP8X_MIN: u64 = 30;
    pub const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];
    pub const VP8_START_CODE_OFFSET: usize = 23;
    pub const VP8L_SIGNATURE: u8 = 0x2F;
    pub const VP8L_SIGNATURE_OFFSET: usize = 20;
    /// Odd-sized RIFF payloads are padded by one byte
    pub const PADDING_TOLERANCE: u64 = 1;
}
