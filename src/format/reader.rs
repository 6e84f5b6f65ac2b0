//! Image inspection reader
//!
//! Ties the pipeline together: sniff the leading bytes, extract the header
//! fields for the detected format, validate them against the real length.

use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::format::constants::SNIFF_LEN;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::{self, ScanLimits};
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::{self, FormatTag};
use crate::format::validation;
use crate::io::seekable::SeekableReader;
use crate::io::ByteSource;

/// Reader that inspects image files with fixed scan limits
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageReader {
    limits: ScanLimits,
}

impl ImageReader {
    /// Creates a reader with the given limits
    pub fn new(limits: ScanLimits) -> Self {
        ImageReader { limits }
    }

    /// The limits applied to every inspection
    pub fn limits(&self) -> &ScanLimits {
        &self.limits
    }

    /// Inspects the file at `path`
    ///
    /// The file extension is logged as a hint only; classification comes
    /// from the content.
    pub fn load(&self, path: &Path) -> InspectionResult<ImageMetadata> {
        info!("Inspecting image file: {}", path.display());
        let context = path.display().to_string();

        let file = File::open(path).map_err(|e| InspectionError::from_io(&e, &context))?;
        let file_meta = file.metadata().map_err(|e| InspectionError::from_io(&e, &context))?;
        if !file_meta.is_file() {
            return Err(InspectionError::Unreadable(format!("{} is not a regular file", context)));
        }

        let mut reader = BufReader::with_capacity(64 * 1024, file);
        let mut source = ByteSource::with_length(&mut reader, file_meta.len(), self.limits.max_scan_bytes);
        let result = self.inspect_source(&mut source);
        match &result {
            Ok(metadata) => check_extension_hint(path, metadata.format()),
            Err(InspectionError::UnknownFormat) => check_extension_hint(path, FormatTag::Unknown),
            Err(_) => {}
        }
        result
    }

    /// Inspects content from any seekable reader
    pub fn read(&self, reader: &mut dyn SeekableReader) -> InspectionResult<ImageMetadata> {
        let mut source = ByteSource::new(reader, self.limits.max_scan_bytes)?;
        self.inspect_source(&mut source)
    }

    /// Inspects an in-memory buffer
    pub fn read_bytes(&self, bytes: &[u8]) -> InspectionResult<ImageMetadata> {
        let mut cursor = std::io::Cursor::new(bytes);
        self.read(&mut cursor)
    }

    fn inspect_source(&self, source: &mut ByteSource) -> InspectionResult<ImageMetadata> {
        let prefix = source.read_prefix(SNIFF_LEN)?;
        let format = match signatures::sniff_prefix(&prefix) {
            Some(format) => format,
            None if prefix.len() < SNIFF_LEN => {
                return Err(InspectionError::TooSmall {
                    needed: SNIFF_LEN as u64,
                    actual: source.len(),
                });
            }
            None => return Err(InspectionError::UnknownFormat),
        };
        debug!("Sniffed format: {}", format);

        let metadata = extractor::extract(source, format, &self.limits)?;
        let validated = validation::validate(&metadata, source.len());
        debug!(
            "Inspection read {} of {} bytes",
            source.bytes_read(),
            source.len()
        );
        Ok(validated)
    }
}

/// Logs when a file's extension disagrees with its content
fn check_extension_hint(path: &Path, format: FormatTag) {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return;
    };
    let extension = extension.to_ascii_lowercase();
    if format.conventional_extensions().contains(&extension.as_str()) {
        debug!("Extension .{} agrees with {} content", extension, format);
    } else {
        warn!(
            "{} has extension .{} but its content is {}",
            path.display(),
            extension,
            format
        );
    }
}
