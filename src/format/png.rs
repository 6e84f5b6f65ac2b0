//! PNG header parsing
//!
//! Reads the IHDR chunk for dimensions and walks chunk headers (never
//! payloads) to find how many bytes the chunk sequence accounts for.

use log::{debug, warn};

use crate::format::constants::png;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::{field, require_len};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;
use crate::io::byte_order::ByteOrder;
use crate::io::ByteSource;

pub(crate) fn extract(source: &mut ByteSource) -> InspectionResult<ImageMetadata> {
    require_len(source, png::MIN_HEADER)?;

    let mut header = [0u8; png::MIN_HEADER as usize];
    source.read_exact_at(0, &mut header)?;

    let handler = ByteOrder::BigEndian.handler();
    let ihdr_len = field(handler.read_u32(&header, 8), "IHDR length")?;
    if &header[12..16] != png::IHDR {
        return Err(InspectionError::MalformedStructure(format!(
            "first chunk is {:?}, expected IHDR",
            String::from_utf8_lossy(&header[12..16])
        )));
    }
    if ihdr_len != png::IHDR_DATA_LEN {
        return Err(InspectionError::MalformedStructure(format!(
            "IHDR length is {}, expected {}",
            ihdr_len,
            png::IHDR_DATA_LEN
        )));
    }

    let width = field(handler.read_u32(&header, png::WIDTH_OFFSET), "width")?;
    let height = field(handler.read_u32(&header, png::HEIGHT_OFFSET), "height")?;
    let bit_depth = header[png::BIT_DEPTH_OFFSET];
    debug!("PNG IHDR: {}x{}, bit depth {}", width, height, bit_depth);

    let declared = declared_length(source)?;
    Ok(ImageMetadata::new(FormatTag::Png, width, height, bit_depth, declared))
}

/// Sums the extents of all chunks through IEND
///
/// A chunk sequence that runs out before IEND still owes a 12-byte IEND
/// chunk. When the read budget runs out first the length cannot be
/// disproved, so the actual length is reported.
fn declared_length(source: &mut ByteSource) -> InspectionResult<u64> {
    let handler = ByteOrder::BigEndian.handler();
    let mut offset = png::MIN_HEADER;
    let mut chunk_header = [0u8; 8];
    let mut chunks = 1u64;

    loop {
        if offset >= source.len() {
            debug!("PNG data ends at {} after {} chunks without IEND", offset, chunks);
            return Ok(offset + png::CHUNK_OVERHEAD);
        }
        if !source.can_read(chunk_header.len()) {
            warn!(
                "Read budget exhausted after {} PNG chunks; declared length not verified",
                chunks
            );
            return Ok(source.len());
        }

        let n = source.read_at(offset, &mut chunk_header)?;
        if n < chunk_header.len() {
            debug!("PNG chunk header at {} is truncated", offset);
            return Ok(offset + png::CHUNK_OVERHEAD);
        }

        let length = field(handler.read_u32(&chunk_header, 0), "chunk length")?;
        offset += png::CHUNK_OVERHEAD + length as u64;
        chunks += 1;

        if &chunk_header[4..8] == png::IEND {
            debug!("PNG IEND reached at {} after {} chunks", offset, chunks);
            return Ok(offset);
        }
    }
}
