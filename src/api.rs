use std::path::{Path, PathBuf};
use log::info;

use crate::binding::backend::{BackendKind, DynamicBackend, InProcessBackend, Inspector, MockBackend};
use crate::binding::loader;
use crate::config::{self, ConfigError, InspectorConfig};
use crate::format::errors::InspectionResult;
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;

/// Main interface to the imgprobe library
pub struct ImageProbe {
    config: InspectorConfig,
    backend: Box<dyn Inspector>,
}

impl ImageProbe {
    /// Create an ImageProbe using the backend named by `config`
    ///
    /// # Arguments
    /// * `config` - Inspector configuration
    ///
    /// # Returns
    /// An ImageProbe instance. A dynamic backend loads its library lazily,
    /// so load failures surface from the first inspection.
    pub fn new(config: InspectorConfig) -> Self {
        let backend: Box<dyn Inspector> = match config.backend {
            BackendKind::InProcess => Box::new(InProcessBackend::new(config.limits)),
            BackendKind::Dynamic => Box::new(DynamicBackend::new(config.library.clone(), config.limits)),
            BackendKind::Mock => Box::new(MockBackend),
        };
        info!("Using {} inspection backend", backend.kind());
        ImageProbe { config, backend }
    }

    /// Create an ImageProbe with the linked inspector and default limits
    pub fn in_process() -> Self {
        let mut config = config::default_config().clone();
        config.backend = BackendKind::InProcess;
        Self::new(config)
    }

    /// Create an ImageProbe backed by the mock inspector
    pub fn mock() -> Self {
        let mut config = config::default_config().clone();
        config.backend = BackendKind::Mock;
        Self::new(config)
    }

    /// Create an ImageProbe from a TOML configuration file
    ///
    /// # Arguments
    /// * `path` - Configuration file, layered over the embedded defaults
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(InspectorConfig::load(path)?))
    }

    /// Which backend answers calls on this instance
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Inspect an image file
    ///
    /// # Arguments
    /// * `path` - Path to the image file
    ///
    /// # Returns
    /// Validated metadata or a hard inspection error
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> InspectionResult<ImageMetadata> {
        self.backend.inspect(path.as_ref())
    }

    /// Classify a byte buffer by its leading bytes
    pub fn classify_bytes(&self, bytes: &[u8]) -> InspectionResult<FormatTag> {
        self.backend.classify_bytes(bytes)
    }

    /// Library locations the dynamic backend searches on this host, in order
    pub fn library_candidates(&self) -> InspectionResult<Vec<PathBuf>> {
        loader::library_candidates_for_host(&self.config.library)
    }
}
