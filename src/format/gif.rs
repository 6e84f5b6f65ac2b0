//! GIF logical screen descriptor parsing

use log::debug;

use crate::format::constants::gif;
use crate::format::errors::InspectionResult;
use crate::format::extractor::{field, read_header, require_len};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;
use crate::io::byte_order::ByteOrder;
use crate::io::ByteSource;

pub(crate) fn extract(source: &mut ByteSource) -> InspectionResult<ImageMetadata> {
    require_len(source, gif::MIN_HEADER)?;

    let header = read_header(source, gif::PACKED_OFFSET as u64 + 1)?;
    let handler = ByteOrder::LittleEndian.handler();
    let width = field(handler.read_u16(&header, gif::WIDTH_OFFSET), "width")?;
    let height = field(handler.read_u16(&header, gif::HEIGHT_OFFSET), "height")?;

    // Color resolution lives in bits 4..7 of the packed byte, stored minus one
    let bit_depth = header
        .get(gif::PACKED_OFFSET)
        .map_or(8, |packed| ((packed >> 4) & 0x07) + 1);

    debug!("GIF screen: {}x{}, color resolution {}", width, height, bit_depth);
    Ok(ImageMetadata::new(
        FormatTag::Gif,
        width as u32,
        height as u32,
        bit_depth,
        source.len(),
    ))
}
