pub mod io;
pub mod format;
pub mod config;
pub mod binding;
pub mod commands;
pub mod api;

use std::path::Path;

pub use crate::api::ImageProbe;

pub use binding::{load_or_fail, resolve_library_artifact, BackendKind, Inspector, NativeLibrary};
pub use config::InspectorConfig;
pub use format::{ErrorKind, FormatTag, ImageMetadata, ImageReader, InspectionError, InspectionResult};

/// Inspects an image file with the in-process inspector and default limits
pub fn inspect<P: AsRef<Path>>(path: P) -> InspectionResult<ImageMetadata> {
    ImageReader::new(config::default_config().limits).load(path.as_ref())
}

/// Classifies a byte buffer by its leading bytes
pub fn classify_bytes(bytes: &[u8]) -> FormatTag {
    format::classify(bytes)
}
