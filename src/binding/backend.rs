//! Inspection backends
//!
//! Callers talk to an [`Inspector`]; which implementation answers is chosen
//! by configuration and never switched silently.

use log::{debug, warn};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::LibraryConfig;
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::ScanLimits;
use crate::format::metadata::ImageMetadata;
use crate::format::reader::ImageReader;
use crate::format::signatures::{classify, FormatTag};
use crate::binding::loader;

/// Available backend implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Inspector linked into the calling binary
    InProcess,
    /// Inspector loaded from the compiled dynamic library
    Dynamic,
    /// Extension and file-size stub
    Mock,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::InProcess => "in_process",
            BackendKind::Dynamic => "dynamic",
            BackendKind::Mock => "mock",
        }
    }

    /// Parses a backend name, accepting `-` in place of `_`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "in_process" | "native" => Some(BackendKind::InProcess),
            "dynamic" => Some(BackendKind::Dynamic),
            "mock" => Some(BackendKind::Mock),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that can inspect image files
pub trait Inspector: Send + Sync {
    /// Which implementation this is
    fn kind(&self) -> BackendKind;

    /// Inspects the file at `path`
    fn inspect(&self, path: &Path) -> InspectionResult<ImageMetadata>;

    /// Classifies a byte buffer by its leading bytes
    fn classify_bytes(&self, bytes: &[u8]) -> InspectionResult<FormatTag>;
}

/// Inspector linked into this binary
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessBackend {
    reader: ImageReader,
}

impl InProcessBackend {
    pub fn new(limits: ScanLimits) -> Self {
        InProcessBackend {
            reader: ImageReader::new(limits),
        }
    }
}

impl Inspector for InProcessBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::InProcess
    }

    fn inspect(&self, path: &Path) -> InspectionResult<ImageMetadata> {
        self.reader.load(path)
    }

    fn classify_bytes(&self, bytes: &[u8]) -> InspectionResult<FormatTag> {
        Ok(classify(bytes))
    }
}

/// Inspector that calls through the process-wide dynamic library
///
/// The library is searched for and loaded on the first call. A failed load
/// is cached and returned from every later call.
#[derive(Debug, Clone)]
pub struct DynamicBackend {
    library: LibraryConfig,
    limits: ScanLimits,
}

impl DynamicBackend {
    pub fn new(library: LibraryConfig, limits: ScanLimits) -> Self {
        DynamicBackend { library, limits }
    }

    fn library(&self) -> InspectionResult<std::sync::Arc<loader::NativeLibrary>> {
        loader::process_library(&self.library)
    }
}

impl Inspector for DynamicBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Dynamic
    }

    fn inspect(&self, path: &Path) -> InspectionResult<ImageMetadata> {
        let library = self.library()?;
        debug!("Inspecting {} via {}", path.display(), library.path().display());
        library.inspect(path, &self.limits)
    }

    fn classify_bytes(&self, bytes: &[u8]) -> InspectionResult<FormatTag> {
        Ok(self.library()?.classify_bytes(bytes))
    }
}

/// Stub that reports existence, size and an extension guess
///
/// It reads no content: dimensions are zero and the result is never
/// well-formed. Meant for wiring tests of callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl Inspector for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }

    fn inspect(&self, path: &Path) -> InspectionResult<ImageMetadata> {
        warn!("Mock backend answering for {}", path.display());
        let context = path.display().to_string();
        let file_meta = fs::metadata(path).map_err(|e| InspectionError::from_io(&e, &context))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(FormatTag::from_extension)
            .unwrap_or(FormatTag::Unknown);
        Ok(ImageMetadata::new(format, 0, 0, 0, file_meta.len()))
    }

    fn classify_bytes(&self, _bytes: &[u8]) -> InspectionResult<FormatTag> {
        Ok(FormatTag::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn backend_names_round_trip() {
        for kind in [BackendKind::InProcess, BackendKind::Dynamic, BackendKind::Mock] {
            assert_eq!(BackendKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BackendKind::from_name("In-Process"), Some(BackendKind::InProcess));
        assert_eq!(BackendKind::from_name("fallback"), None);
    }

    #[test]
    fn mock_reports_size_and_extension_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.JPG");
        fs::write(&path, b"plain text, not a jpeg").unwrap();

        let metadata = MockBackend.inspect(&path).unwrap();
        assert_eq!(metadata.format(), FormatTag::Jpeg);
        assert_eq!(metadata.declared_byte_length(), 22);
        assert_eq!((metadata.width(), metadata.height()), (0, 0));
        assert!(!metadata.well_formed());

        let err = MockBackend.inspect(&dir.path().join("missing.png")).unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn in_process_classifies_content() {
        let backend = InProcessBackend::default();
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR";
        assert_eq!(backend.classify_bytes(png).unwrap(), FormatTag::Png);
        assert_eq!(backend.classify_bytes(b"short").unwrap(), FormatTag::Unknown);
    }
}
