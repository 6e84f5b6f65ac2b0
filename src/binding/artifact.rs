//! Platform-to-artifact resolution
//!
//! Maps a platform/architecture pair to the file name of the compiled
//! dynamic library and to the directories it is searched in.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::format::errors::{InspectionError, InspectionResult};

/// Module name of the compiled library
pub const MODULE_NAME: &str = "imgprobe";

/// Platforms a compiled artifact exists for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Parses a platform identifier
    ///
    /// Accepts the short ids `win`, `mac`, `linux` plus the spellings used by
    /// common runtimes (`win32`, `windows`, `darwin`, `macos`).
    pub fn from_id(id: &str) -> InspectionResult<Self> {
        match id.to_ascii_lowercase().as_str() {
            "win" | "win32" | "windows" => Ok(Platform::Windows),
            "mac" | "darwin" | "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(InspectionError::UnsupportedPlatform(format!(
                "no artifact mapping for platform '{}'",
                other
            ))),
        }
    }

    /// The platform this binary was compiled for
    pub fn current() -> InspectionResult<Self> {
        Self::from_id(std::env::consts::OS)
    }

    /// Short identifier
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::MacOs => "mac",
            Platform::Linux => "linux",
        }
    }

    /// File name prefix for dynamic libraries
    pub fn library_prefix(&self) -> &'static str {
        match self {
            Platform::Windows => "",
            Platform::MacOs | Platform::Linux => "lib",
        }
    }

    /// File extension for dynamic libraries
    pub fn library_extension(&self) -> &'static str {
        match self {
            Platform::Windows => "dll",
            Platform::MacOs => "dylib",
            Platform::Linux => "so",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// CPU architectures a compiled artifact exists for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
    Ia32,
    Arm,
}

impl Arch {
    /// Parses an architecture identifier
    pub fn from_id(id: &str) -> InspectionResult<Self> {
        match id.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            "ia32" | "x86" | "i686" | "i386" => Ok(Arch::Ia32),
            "arm" | "armv7" => Ok(Arch::Arm),
            other => Err(InspectionError::UnsupportedPlatform(format!(
                "no artifact mapping for architecture '{}'",
                other
            ))),
        }
    }

    /// The architecture this binary was compiled for
    pub fn current() -> InspectionResult<Self> {
        Self::from_id(std::env::consts::ARCH)
    }

    /// Short identifier
    pub fn id(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Ia32 => "ia32",
            Arch::Arm => "arm",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Artifact file name for a module on a platform (`<module>.<ext>`)
pub fn artifact_file_name(module_name: &str, platform: Platform) -> String {
    format!("{}.{}", module_name, platform.library_extension())
}

/// File names a build of `module_name` may carry, preferred first
///
/// Cargo names a `cdylib` with the platform prefix (`libimgprobe.so`), so
/// both spellings are searched where they differ.
pub fn library_file_names(module_name: &str, platform: Platform) -> Vec<String> {
    let mut names = vec![artifact_file_name(module_name, platform)];
    if !platform.library_prefix().is_empty() {
        names.push(format!("{}{}", platform.library_prefix(), names[0]));
    }
    names
}

/// Resolves the artifact file name for a platform and architecture id
///
/// # Arguments
/// * `platform_id` - Platform identifier (`win`, `mac`, `linux` or an alias)
/// * `arch_id` - Architecture identifier (`x64`, `arm64`, `ia32`, `arm` or an alias)
///
/// # Returns
/// The library file name, or `UnsupportedPlatform`
pub fn resolve_library_artifact(platform_id: &str, arch_id: &str) -> InspectionResult<String> {
    resolve_module_artifact(MODULE_NAME, platform_id, arch_id)
}

/// Like [`resolve_library_artifact`] for a configured module name
pub fn resolve_module_artifact(module_name: &str, platform_id: &str, arch_id: &str) -> InspectionResult<String> {
    let platform = Platform::from_id(platform_id)?;
    Arch::from_id(arch_id)?;
    Ok(artifact_file_name(module_name, platform))
}

/// Directory under an install root holding the artifact for a target
pub fn install_subdir(install_root: &Path, platform: Platform, arch: Arch) -> PathBuf {
    install_root.join(format!("{}-{}", platform.id(), arch.id()))
}
