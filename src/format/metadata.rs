//! Image metadata produced by an inspection

use std::fmt;

use crate::format::errors::InspectionError;
use crate::format::signatures::FormatTag;

/// Metadata extracted from an image container
///
/// Fields are private: a value is built once by the extractor and only ever
/// replaced (never mutated) by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    format: FormatTag,
    width: u32,
    height: u32,
    bit_depth: u8,
    declared_byte_length: u64,
    well_formed: bool,
    issue: Option<InspectionError>,
}

impl ImageMetadata {
    /// Creates unvalidated metadata (`well_formed` is false until validated)
    pub fn new(format: FormatTag, width: u32, height: u32, bit_depth: u8, declared_byte_length: u64) -> Self {
        ImageMetadata {
            format,
            width,
            height,
            bit_depth,
            declared_byte_length,
            well_formed: false,
            issue: None,
        }
    }

    /// Rebuilds metadata from its parts, e.g. after crossing the C ABI
    pub(crate) fn from_parts(
        format: FormatTag,
        width: u32,
        height: u32,
        bit_depth: u8,
        declared_byte_length: u64,
        well_formed: bool,
        issue: Option<InspectionError>,
    ) -> Self {
        ImageMetadata {
            format,
            width,
            height,
            bit_depth,
            declared_byte_length,
            well_formed,
            issue,
        }
    }

    pub fn format(&self) -> FormatTag {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bits per channel (PNG, JPEG) or per pixel (BMP), as the container states it
    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Length in bytes that the container's own structure accounts for
    pub fn declared_byte_length(&self) -> u64 {
        self.declared_byte_length
    }

    /// True when parsing and integrity validation both passed
    pub fn well_formed(&self) -> bool {
        self.well_formed
    }

    /// The soft failure found by validation, if any
    pub fn issue(&self) -> Option<&InspectionError> {
        self.issue.as_ref()
    }

    /// Returns a copy marked well-formed
    pub(crate) fn accepted(&self) -> Self {
        ImageMetadata {
            well_formed: true,
            issue: None,
            ..self.clone()
        }
    }

    /// Returns a copy downgraded with the given issue
    pub(crate) fn downgraded(&self, issue: InspectionError) -> Self {
        ImageMetadata {
            well_formed: false,
            issue: Some(issue),
            ..self.clone()
        }
    }
}

impl fmt::Display for ImageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Format: {}", self.format)?;
        writeln!(f, "  Dimensions: {}x{}", self.width, self.height)?;
        writeln!(f, "  Bit depth: {}", self.bit_depth)?;
        writeln!(f, "  Declared length: {} bytes", self.declared_byte_length)?;
        write!(f, "  Well formed: {}", self.well_formed)?;
        if let Some(issue) = &self.issue {
            write!(f, "\n  Issue: {} ({})", issue.code(), issue)?;
        }
        Ok(())
    }
}
