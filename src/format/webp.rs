//! WEBP (RIFF) header parsing
//!
//! Dimensions live in a different bit layout for each of the three
//! bitstream kinds found in the first chunk:
//! - `VP8 ` lossy: 14-bit little-endian fields after the keyframe start code
//! - `VP8L` lossless: two 14-bit fields packed into one 32-bit word, minus one
//! - `VP8X` extended: 24-bit canvas fields, minus one

use log::debug;

use crate::format::constants::webp;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::{field, read_header, require_len};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;
use crate::io::byte_order::ByteOrder;
use crate::io::ByteSource;

const DIMENSION_MASK_14: u32 = 0x3FFF;

pub(crate) fn extract(source: &mut ByteSource) -> InspectionResult<ImageMetadata> {
    require_len(source, webp::MIN_HEADER)?;

    let header = read_header(source, webp::VP8X_MIN)?;
    let handler = ByteOrder::LittleEndian.handler();
    let riff_size = field(handler.read_u32(&header, webp::RIFF_SIZE_OFFSET), "RIFF size")?;
    let fourcc = &header[webp::CHUNK_OFFSET..webp::CHUNK_OFFSET + 4];

    let (width, height) = if fourcc == webp::VP8 {
        require_len(source, webp::VP8_MIN)?;
        let start = webp::VP8_START_CODE_OFFSET;
        if header[start..start + 3] != webp::VP8_START_CODE {
            return Err(InspectionError::MalformedStructure(
                "VP8 keyframe start code missing".to_string(),
            ));
        }
        let width = field(handler.read_u16(&header, 26), "VP8 width")? as u32 & DIMENSION_MASK_14;
        let height = field(handler.read_u16(&header, 28), "VP8 height")? as u32 & DIMENSION_MASK_14;
        (width, height)
    } else if fourcc == webp::VP8L {
        require_len(source, webp::VP8L_MIN)?;
        if header[webp::VP8L_SIGNATURE_OFFSET] != webp::VP8L_SIGNATURE {
            return Err(InspectionError::MalformedStructure(
                "VP8L signature byte missing".to_string(),
            ));
        }
        let bits = field(handler.read_u32(&header, 21), "VP8L dimensions")?;
        ((bits & DIMENSION_MASK_14) + 1, ((bits >> 14) & DIMENSION_MASK_14) + 1)
    } else if fourcc == webp::VP8X {
        require_len(source, webp::VP8X_MIN)?;
        let width = field(handler.read_u24(&header, 24), "VP8X canvas width")? + 1;
        let height = field(handler.read_u24(&header, 27), "VP8X canvas height")? + 1;
        (width, height)
    } else {
        return Err(InspectionError::MalformedStructure(format!(
            "unknown WEBP chunk {:?}",
            String::from_utf8_lossy(fourcc)
        )));
    };

    let declared = riff_size as u64 + webp::RIFF_HEADER_LEN;
    debug!(
        "WEBP {}: {}x{}, RIFF declares {} bytes",
        String::from_utf8_lossy(fourcc).trim_end(),
        width,
        height,
        declared
    );
    Ok(ImageMetadata::new(FormatTag::Webp, width, height, 8, declared))
}
