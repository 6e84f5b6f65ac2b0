//! Integrity validation
//!
//! Checks parsed metadata for internal consistency. Validation never fails
//! the call: suspicious metadata is returned with `well_formed = false` and
//! the issue attached, so callers can still look at what was parsed.

use log::{debug, warn};

use crate::format::constants::{webp, MAX_DIMENSION};
use crate::format::errors::InspectionError;
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;

/// Validates metadata against the actual length of the source
///
/// # Arguments
/// * `metadata` - Metadata produced by the extractor
/// * `actual_byte_length` - Length of the inspected content
///
/// # Returns
/// A copy of the metadata with `well_formed` set, or downgraded with an issue
pub fn validate(metadata: &ImageMetadata, actual_byte_length: u64) -> ImageMetadata {
    if metadata.format() == FormatTag::Unknown {
        return metadata.downgraded(InspectionError::UnknownFormat);
    }

    if let Err(issue) = validate_dimensions(metadata.width(), metadata.height()) {
        warn!("{} rejected: {}", metadata.format(), issue);
        return metadata.downgraded(issue);
    }

    let declared = metadata.declared_byte_length();
    let allowed = actual_byte_length.saturating_add(length_tolerance(metadata.format()));
    if declared > allowed {
        warn!(
            "{} declares {} bytes but source has {}",
            metadata.format(),
            declared,
            actual_byte_length
        );
        return metadata.downgraded(InspectionError::SizeMismatch {
            declared,
            actual: actual_byte_length,
        });
    }

    debug!("{} metadata passed validation", metadata.format());
    metadata.accepted()
}

/// Validates that both dimensions lie in `[1, MAX_DIMENSION]`
///
/// Zero-area images and absurd sizes usually mean the parser read the
/// wrong bytes.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), InspectionError> {
    let in_range = |value: u32| (1..=MAX_DIMENSION).contains(&value);
    if in_range(width) && in_range(height) {
        Ok(())
    } else {
        Err(dimension_issue(width, height))
    }
}

/// The issue attached when dimensions are out of range
///
/// Built only from the dimensions so it can be reproduced exactly on the far
/// side of the C ABI.
pub(crate) fn dimension_issue(width: u32, height: u32) -> InspectionError {
    InspectionError::MalformedStructure(format!(
        "dimensions {}x{} outside 1..={}",
        width, height, MAX_DIMENSION
    ))
}

/// Bytes by which the declared length may exceed the actual length
fn length_tolerance(format: FormatTag) -> u64 {
    match format {
        FormatTag::Webp => webp::PADDING_TOLERANCE,
        _ => 0,
    }
}
