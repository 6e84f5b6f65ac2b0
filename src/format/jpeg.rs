//! JPEG marker scanning
//!
//! Walks marker segments from SOI looking for the first start-of-frame
//! header. Segment payloads are skipped by offset; only the 4-byte marker
//! headers and the frame fields are read.

use log::debug;

use crate::format::constants::jpeg;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::{field, require_len, ScanLimits};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;
use crate::io::byte_order::ByteOrder;
use crate::io::ByteSource;

/// Precision, height and width from a frame header
struct Frame {
    precision: u8,
    height: u16,
    width: u16,
}

/// Whether a marker is a start-of-frame header
pub(crate) fn is_sof(marker: u8) -> bool {
    (jpeg::SOF_FIRST..=jpeg::SOF_LAST).contains(&marker)
        && !matches!(marker, jpeg::DHT | jpeg::JPG | jpeg::DAC)
}

/// Markers that stand alone without a length field
fn is_standalone(marker: u8) -> bool {
    marker == jpeg::TEM || (jpeg::RST0..=jpeg::SOI).contains(&marker)
}

pub(crate) fn extract(source: &mut ByteSource, limits: &ScanLimits) -> InspectionResult<ImageMetadata> {
    require_len(source, jpeg::MIN_HEADER)?;

    let handler = ByteOrder::BigEndian.handler();
    let window_end = source.len().min(limits.jpeg_scan_window);
    let mut frame: Option<Frame> = None;
    let mut pos: u64 = 2; // past SOI
    let mut declared: u64 = pos;
    let mut segment = [0u8; 4];

    while pos < window_end {
        let n = source.read_at(pos, &mut segment)?;
        if n < 2 {
            break;
        }
        if segment[0] != jpeg::MARKER_PREFIX {
            if frame.is_none() {
                return Err(InspectionError::MalformedStructure(format!(
                    "lost marker sync at offset {}",
                    pos
                )));
            }
            break;
        }

        let marker = segment[1];
        if marker == jpeg::MARKER_PREFIX {
            // fill byte
            pos += 1;
            continue;
        }
        if is_standalone(marker) {
            pos += 2;
            declared = pos;
            continue;
        }
        if marker == jpeg::EOI || n < segment.len() {
            break;
        }

        let length = field(handler.read_u16(&segment, 2), "segment length")?;
        if length < 2 {
            if frame.is_none() {
                return Err(InspectionError::MalformedStructure(format!(
                    "segment {:#04x} at offset {} has length {}",
                    marker, pos, length
                )));
            }
            break;
        }
        let segment_end = pos + 2 + length as u64;

        if frame.is_none() && is_sof(marker) {
            frame = Some(read_frame(source, pos, length)?);
            debug!("JPEG SOF {:#04x} at offset {}", marker, pos);
        }

        declared = segment_end;
        if marker == jpeg::SOS {
            break;
        }
        pos = segment_end;
    }

    let frame = frame.ok_or_else(|| {
        InspectionError::MalformedStructure(format!(
            "no start-of-frame marker within the first {} bytes",
            window_end
        ))
    })?;

    debug!(
        "JPEG frame: {}x{}, precision {}, header segments end at {}",
        frame.width, frame.height, frame.precision, declared
    );
    Ok(ImageMetadata::new(
        FormatTag::Jpeg,
        frame.width as u32,
        frame.height as u32,
        frame.precision,
        declared,
    ))
}

/// Reads the frame fields of the SOF segment whose marker sits at `pos`
fn read_frame(source: &mut ByteSource, pos: u64, length: u16) -> InspectionResult<Frame> {
    if length < jpeg::MIN_SOF_LENGTH {
        return Err(InspectionError::MalformedStructure(format!(
            "frame header length {} is shorter than {}",
            length,
            jpeg::MIN_SOF_LENGTH
        )));
    }

    let mut fields = [0u8; 5];
    let n = source.read_at(pos + 4, &mut fields)?;
    if n < fields.len() {
        return Err(InspectionError::MalformedStructure(
            "frame header is truncated".to_string(),
        ));
    }

    let handler = ByteOrder::BigEndian.handler();
    Ok(Frame {
        precision: fields[0],
        height: field(handler.read_u16(&fields, 1), "frame height")?,
        width: field(handler.read_u16(&fields, 3), "frame width")?,
    })
}
