//! Image container inspection
//!
//! This module sniffs container formats from content, extracts header
//! metadata for PNG, JPEG, GIF, BMP and WEBP, and validates it.

pub mod errors;
pub(crate) mod constants;
pub mod signatures;
pub mod metadata;
pub mod extractor;
pub mod validation;
pub mod reader;
mod png;
mod jpeg;
mod gif;
mod bmp;
mod webp;
mod tests;

pub use constants::{MAX_DIMENSION, SNIFF_LEN};
pub use errors::{ErrorKind, InspectionError, InspectionResult};
pub use extractor::{extract, ScanLimits};
pub use metadata::ImageMetadata;
pub use reader::ImageReader;
pub use signatures::{classify, sniff_prefix, FormatTag};
pub use validation::validate;
