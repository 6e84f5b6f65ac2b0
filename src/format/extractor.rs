//! Metadata extraction dispatch
//!
//! Routes a classified source to the parser for its format. Parsers read
//! only header structures through the budgeted [`ByteSource`], so memory use
//! is bounded by the header sizes, not by the file.

use log::debug;

use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;
use crate::format::{bmp, gif, jpeg, png, webp};
use crate::io::ByteSource;

/// Default read budget per inspection
pub const DEFAULT_MAX_SCAN_BYTES: u64 = 4 * 1024 * 1024;

/// Default JPEG marker scan window
pub const DEFAULT_JPEG_SCAN_WINDOW: u64 = 1024 * 1024;

/// Read limits applied to a single inspection
///
/// Running out of `max_scan_bytes` is reported as `Unreadable` (the file was
/// not read far enough to judge it), except in the PNG chunk walk, which
/// stops and trusts the actual length. A JPEG whose frame header lies past
/// `jpeg_scan_window` is `MalformedStructure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Maximum total bytes read from the source
    pub max_scan_bytes: u64,
    /// Offset past which the JPEG marker scan gives up looking for a frame header
    pub jpeg_scan_window: u64,
}

impl Default for ScanLimits {
    fn default() -> Self {
        ScanLimits {
            max_scan_bytes: DEFAULT_MAX_SCAN_BYTES,
            jpeg_scan_window: DEFAULT_JPEG_SCAN_WINDOW,
        }
    }
}

/// Extracts metadata for an already classified source
///
/// The returned metadata is not yet validated.
pub fn extract(source: &mut ByteSource, format: FormatTag, limits: &ScanLimits) -> InspectionResult<ImageMetadata> {
    debug!("Extracting {} metadata from {} bytes", format, source.len());
    match format {
        FormatTag::Png => png::extract(source),
        FormatTag::Jpeg => jpeg::extract(source, limits),
        FormatTag::Gif => gif::extract(source),
        FormatTag::Bmp => bmp::extract(source),
        FormatTag::Webp => webp::extract(source),
        FormatTag::Unknown => Err(InspectionError::UnknownFormat),
    }
}

/// Fails with `TooSmall` when the source is shorter than `needed`
pub(crate) fn require_len(source: &ByteSource, needed: u64) -> InspectionResult<()> {
    if source.len() < needed {
        return Err(InspectionError::TooSmall {
            needed,
            actual: source.len(),
        });
    }
    Ok(())
}

/// Reads up to `count` leading bytes into a header buffer
pub(crate) fn read_header(source: &mut ByteSource, count: u64) -> InspectionResult<Vec<u8>> {
    source.read_prefix(count as usize)
}

/// Turns a missing header field into a structural error
pub(crate) fn field<T>(value: Option<T>, name: &str) -> InspectionResult<T> {
    value.ok_or_else(|| InspectionError::MalformedStructure(format!("header field {} is truncated", name)))
}
