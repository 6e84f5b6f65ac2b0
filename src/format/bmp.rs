//! BMP header parsing
//!
//! The DIB header size picks the layout: the 12-byte OS/2 core header
//! stores 16-bit dimensions, every later header 32-bit signed ones.

use log::debug;

use crate::format::constants::bmp;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::{field, read_header, require_len};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;
use crate::io::byte_order::ByteOrder;
use crate::io::ByteSource;

pub(crate) fn extract(source: &mut ByteSource) -> InspectionResult<ImageMetadata> {
    require_len(source, bmp::MIN_HEADER)?;

    let header = read_header(source, bmp::MIN_INFO_HEADER)?;
    let handler = ByteOrder::LittleEndian.handler();
    let file_size = field(handler.read_u32(&header, bmp::FILE_SIZE_OFFSET), "file size")?;
    let dib_size = field(handler.read_u32(&header, bmp::DIB_SIZE_OFFSET), "DIB header size")?;

    let (width, height, bit_count) = if dib_size == bmp::CORE_HEADER_SIZE {
        let width = field(handler.read_u16(&header, bmp::WIDTH_OFFSET), "width")?;
        let height = field(handler.read_u16(&header, bmp::CORE_HEIGHT_OFFSET), "height")?;
        let bit_count = field(handler.read_u16(&header, bmp::CORE_BIT_COUNT_OFFSET), "bit count")?;
        (width as u32, height as u32, bit_count)
    } else if bmp::INFO_HEADER_SIZES.contains(&dib_size) {
        require_len(source, bmp::MIN_INFO_HEADER)?;
        let width = field(handler.read_i32(&header, bmp::WIDTH_OFFSET), "width")?;
        let height = field(handler.read_i32(&header, bmp::INFO_HEIGHT_OFFSET), "height")?;
        let bit_count = field(handler.read_u16(&header, bmp::INFO_BIT_COUNT_OFFSET), "bit count")?;
        if width < 0 {
            return Err(InspectionError::MalformedStructure(format!(
                "negative BMP width {}",
                width
            )));
        }
        // Negative height marks a top-down bitmap
        (width as u32, height.unsigned_abs(), bit_count)
    } else {
        return Err(InspectionError::MalformedStructure(format!(
            "unsupported DIB header size {}",
            dib_size
        )));
    };

    // Zero defers the depth to an embedded JPEG/PNG stream (info headers only)
    let depth_ok = bmp::BIT_COUNTS.contains(&bit_count) && (bit_count != 0 || dib_size != bmp::CORE_HEADER_SIZE);
    if !depth_ok {
        return Err(InspectionError::MalformedStructure(format!(
            "invalid BMP bit count {}",
            bit_count
        )));
    }

    let declared = if file_size == 0 {
        source.len()
    } else {
        file_size as u64
    };

    debug!(
        "BMP ({}-byte DIB header): {}x{}, {} bpp, declares {} bytes",
        dib_size, width, height, bit_count, declared
    );
    Ok(ImageMetadata::new(
        FormatTag::Bmp,
        width,
        height,
        bit_count as u8,
        declared,
    ))
}
