//! Configuration loading
//!
//! Configuration is TOML. The defaults ship embedded in the binary
//! (`imgprobe.toml`) and are parsed once; a user file is layered on top of
//! them, so it only needs the keys it wants to change.

use lazy_static::lazy_static;
use log::warn;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::binding::backend::BackendKind;
use crate::binding::artifact::MODULE_NAME;
use crate::format::extractor::{ScanLimits, DEFAULT_JPEG_SCAN_WINDOW, DEFAULT_MAX_SCAN_BYTES};

/// Environment variable naming an explicit library artifact
pub const LIBRARY_ENV_VAR: &str = "IMGPROBE_LIBRARY";

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "IMGPROBE_CONFIG";

lazy_static! {
    // Parse the embedded defaults once
    static ref DEFAULT_CONFIG: InspectorConfig = {
        let content = include_str!("../imgprobe.toml");
        InspectorConfig::parse(content).unwrap_or_else(|e| {
            warn!("Failed to parse embedded configuration: {}", e);
            InspectorConfig::builtin()
        })
    };
}

/// Returns the process default configuration
pub fn default_config() -> &'static InspectorConfig {
    &DEFAULT_CONFIG
}

/// Errors raised while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io(PathBuf, io::Error),
    /// The content is not valid TOML
    Parse(String),
    /// A key holds a value of the wrong type or out of range
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Cannot read config {}: {}", path.display(), e),
            ConfigError::Parse(msg) => write!(f, "Failed to parse TOML: {}", msg),
            ConfigError::InvalidValue { key, message } => write!(f, "Invalid value for {}: {}", key, message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where to look for the compiled library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Module name used to build the artifact file name
    pub module_name: String,
    /// Explicit artifact path
    pub path: Option<PathBuf>,
    /// Build-output directories, searched in order
    pub build_dirs: Vec<PathBuf>,
    /// Root of the installed-package layout
    pub install_dir: PathBuf,
}

/// Inspector configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    /// Backend selected for inspect/classify calls
    pub backend: BackendKind,
    /// Read limits per inspection
    pub limits: ScanLimits,
    /// Library search settings
    pub library: LibraryConfig,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        default_config().clone()
    }
}

impl InspectorConfig {
    /// Hard-coded fallback used when the embedded defaults cannot be parsed
    pub fn builtin() -> Self {
        InspectorConfig {
            backend: BackendKind::InProcess,
            limits: ScanLimits {
                max_scan_bytes: DEFAULT_MAX_SCAN_BYTES,
                jpeg_scan_window: DEFAULT_JPEG_SCAN_WINDOW,
            },
            library: LibraryConfig {
                module_name: MODULE_NAME.to_string(),
                path: None,
                build_dirs: vec![PathBuf::from("target/release"), PathBuf::from("target/debug")],
                install_dir: PathBuf::from("prebuilds"),
            },
        }
    }

    /// Parses a configuration from TOML, starting from the built-in values
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::builtin();
        config.apply_str(content)?;
        Ok(config)
    }

    /// Loads a configuration file layered over the process defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config = default_config().clone();
        config.apply_str(&content)?;
        Ok(config)
    }

    /// Loads the file named by `IMGPROBE_CONFIG`, or the defaults if unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(default_config().clone()),
        }
    }

    /// Applies the keys present in a TOML document
    pub fn apply_str(&mut self, content: &str) -> Result<(), ConfigError> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(ConfigError::Parse(e.to_string())),
        };

        if let Some(name) = toml_value.get("backend") {
            let name = expect_str(name, "backend")?;
            self.backend = BackendKind::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
                key: "backend".to_string(),
                message: format!("unknown backend '{}'", name),
            })?;
        }

        if let Some(limits) = toml_value.get("limits").and_then(|v| v.as_table()) {
            for (key, value) in limits {
                match key.as_str() {
                    "max_scan_bytes" => self.limits.max_scan_bytes = expect_positive(value, "limits.max_scan_bytes")?,
                    "jpeg_scan_window" => {
                        self.limits.jpeg_scan_window = expect_positive(value, "limits.jpeg_scan_window")?
                    }
                    other => warn!("Ignoring unknown config key limits.{}", other),
                }
            }
        }

        if let Some(library) = toml_value.get("library").and_then(|v| v.as_table()) {
            for (key, value) in library {
                match key.as_str() {
                    "module_name" => {
                        let name = expect_str(value, "library.module_name")?;
                        if name.is_empty() {
                            return Err(ConfigError::InvalidValue {
                                key: "library.module_name".to_string(),
                                message: "must not be empty".to_string(),
                            });
                        }
                        self.library.module_name = name.to_string();
                    }
                    "path" => self.library.path = Some(PathBuf::from(expect_str(value, "library.path")?)),
                    "build_dirs" => {
                        let dirs = value.as_array().ok_or_else(|| ConfigError::InvalidValue {
                            key: "library.build_dirs".to_string(),
                            message: "expected an array of strings".to_string(),
                        })?;
                        self.library.build_dirs = dirs
                            .iter()
                            .map(|dir| expect_str(dir, "library.build_dirs").map(PathBuf::from))
                            .collect::<Result<_, _>>()?;
                    }
                    "install_dir" => {
                        self.library.install_dir = PathBuf::from(expect_str(value, "library.install_dir")?)
                    }
                    other => warn!("Ignoring unknown config key library.{}", other),
                }
            }
        }

        Ok(())
    }
}

fn expect_str<'v>(value: &'v toml::Value, key: &str) -> Result<&'v str, ConfigError> {
    value.as_str().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected a string, found {}", value.type_str()),
    })
}

fn expect_positive(value: &toml::Value, key: &str) -> Result<u64, ConfigError> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as u64),
        Some(n) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be positive, got {}", n),
        }),
        None => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected an integer, found {}", value.type_str()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = InspectorConfig::parse(include_str!("../imgprobe.toml")).unwrap();
        assert_eq!(config, InspectorConfig::builtin());
        assert_eq!(default_config(), &config);
    }

    #[test]
    fn partial_file_overrides_only_its_keys() {
        let mut config = InspectorConfig::builtin();
        config
            .apply_str("backend = \"dynamic\"\n[limits]\nmax_scan_bytes = 1024\n[library]\npath = \"/opt/lib/libimgprobe.so\"\n")
            .unwrap();

        assert_eq!(config.backend, BackendKind::Dynamic);
        assert_eq!(config.limits.max_scan_bytes, 1024);
        assert_eq!(config.limits.jpeg_scan_window, DEFAULT_JPEG_SCAN_WINDOW);
        assert_eq!(config.library.path, Some(PathBuf::from("/opt/lib/libimgprobe.so")));
        assert_eq!(config.library.install_dir, PathBuf::from("prebuilds"));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = InspectorConfig::builtin();
        assert!(matches!(
            config.apply_str("backend = \"fallback\""),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.apply_str("[limits]\nmax_scan_bytes = -5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(config.apply_str("not toml ="), Err(ConfigError::Parse(_))));
    }
}
