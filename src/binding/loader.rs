//! Dynamic library search and loading
//!
//! The compiled `cdylib` is located from an ordered candidate list and loaded
//! at most once per process through [`LibraryGate`].

use lazy_static::lazy_static;
use libloading::Library;
use log::{debug, info, warn};
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::binding::artifact::{install_subdir, library_file_names, Arch, Platform};
use crate::binding::ffi::{
    self, AbiVersionFn, ClassifyFn, InspectWithLimitsFn, RawImageMetadata, RawScanLimits, ABI_VERSION,
    ABI_VERSION_SYMBOL, CLASSIFY_SYMBOL, INSPECT_WITH_LIMITS_SYMBOL,
};
use crate::config::{LibraryConfig, LIBRARY_ENV_VAR};
use crate::format::errors::{InspectionError, InspectionResult};
use crate::format::extractor::ScanLimits;
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::FormatTag;

/// A loaded inspection library with its resolved entry points
pub struct NativeLibrary {
    path: PathBuf,
    abi_version: u32,
    inspect_fn: InspectWithLimitsFn,
    classify_fn: ClassifyFn,
    // Keeps the mapping alive for the copied fn pointers above
    _library: Library,
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .field("abi_version", &self.abi_version)
            .finish()
    }
}

impl NativeLibrary {
    /// Loads the library at `path` and resolves its exported symbols
    ///
    /// Fails with `Unreadable` when the file is not a loadable library, lacks
    /// a symbol or reports a different ABI version.
    pub fn load(path: &Path) -> InspectionResult<Self> {
        let context = path.display().to_string();
        let load_error = |e: libloading::Error| InspectionError::Unreadable(format!("{}: {}", context, e));

        // SAFETY: loading runs the library's initialisers. Candidates are
        // builds of this crate; the ABI version check below rejects others
        // before any inspection entry point is called.
        unsafe {
            let library = Library::new(path).map_err(load_error)?;
            let abi_version_fn = *library.get::<AbiVersionFn>(ABI_VERSION_SYMBOL).map_err(load_error)?;
            let abi_version = abi_version_fn();
            if abi_version != ABI_VERSION {
                return Err(InspectionError::Unreadable(format!(
                    "{}: ABI version {} (expected {})",
                    context, abi_version, ABI_VERSION
                )));
            }
            let inspect_fn = *library
                .get::<InspectWithLimitsFn>(INSPECT_WITH_LIMITS_SYMBOL)
                .map_err(load_error)?;
            let classify_fn = *library.get::<ClassifyFn>(CLASSIFY_SYMBOL).map_err(load_error)?;

            Ok(NativeLibrary {
                path: path.to_path_buf(),
                abi_version,
                inspect_fn,
                classify_fn,
                _library: library,
            })
        }
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// Inspects a file through the library, within `limits`
    pub fn inspect(&self, path: &Path, limits: &ScanLimits) -> InspectionResult<ImageMetadata> {
        let context = path.display().to_string();
        let c_path = path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| InspectionError::Unreadable(format!("{}: path is not representable", context)))?;

        let raw_limits = RawScanLimits::from(*limits);
        let mut raw = RawImageMetadata::default();
        // SAFETY: c_path is NUL-terminated, raw_limits outlives the call and
        // raw is a valid out slot
        let status = unsafe { (self.inspect_fn)(c_path.as_ptr(), &raw_limits, &mut raw) };
        ffi::decode_result(status, &raw, &context)
    }

    /// Classifies a byte buffer through the library
    pub fn classify_bytes(&self, bytes: &[u8]) -> FormatTag {
        // SAFETY: the slice is valid for len bytes
        let code = unsafe { (self.classify_fn)(bytes.as_ptr(), bytes.len()) };
        FormatTag::from_code(code)
    }
}

/// Returns the first candidate `loader` accepts
///
/// Missing candidates and load failures are logged and skipped. `NotFound`
/// is returned only after every candidate has been tried.
pub fn load_first<T, F>(candidates: &[PathBuf], mut loader: F) -> InspectionResult<T>
where
    F: FnMut(&Path) -> InspectionResult<T>,
{
    for candidate in candidates {
        if !candidate.is_file() {
            debug!("Library candidate {} does not exist", candidate.display());
            continue;
        }
        match loader(candidate) {
            Ok(loaded) => {
                info!("Loaded inspection library from {}", candidate.display());
                return Ok(loaded);
            }
            Err(e) => warn!("Skipping library candidate {}: {}", candidate.display(), e),
        }
    }

    let tried: Vec<String> = candidates.iter().map(|c| c.display().to_string()).collect();
    Err(InspectionError::NotFound(format!(
        "no loadable inspection library among [{}]",
        tried.join(", ")
    )))
}

/// Loads the first usable library among `candidates`
pub fn load_or_fail(candidates: &[PathBuf]) -> InspectionResult<NativeLibrary> {
    load_first(candidates, NativeLibrary::load)
}

/// Ordered artifact locations for a target
///
/// An explicit override (environment, then configured path) comes first,
/// then the build-output directories, then the installed-package layout.
pub fn library_candidates(
    config: &LibraryConfig,
    env_override: Option<PathBuf>,
    platform: Platform,
    arch: Arch,
) -> Vec<PathBuf> {
    let file_names = library_file_names(&config.module_name, platform);
    let mut candidates = Vec::new();

    if let Some(path) = env_override {
        candidates.push(path);
    }
    if let Some(path) = &config.path {
        candidates.push(path.clone());
    }

    let install_dir = install_subdir(&config.install_dir, platform, arch);
    for dir in config.build_dirs.iter().chain(std::iter::once(&install_dir)) {
        for name in &file_names {
            candidates.push(dir.join(name));
        }
    }
    candidates
}

/// Candidates for the host, honouring `IMGPROBE_LIBRARY`
pub fn library_candidates_for_host(config: &LibraryConfig) -> InspectionResult<Vec<PathBuf>> {
    let platform = Platform::current()?;
    let arch = Arch::current()?;
    let env_override = std::env::var_os(LIBRARY_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    Ok(library_candidates(config, env_override, platform, arch))
}

/// One-time load gate
///
/// The first `get_or_load` runs the loader; concurrent callers block until
/// it finishes. Success and failure are both cached for the process lifetime.
pub struct LibraryGate<T> {
    cell: OnceLock<Result<Arc<T>, InspectionError>>,
}

impl<T> LibraryGate<T> {
    pub const fn new() -> Self {
        LibraryGate { cell: OnceLock::new() }
    }

    /// Returns the loaded value, loading it on first use
    pub fn get_or_load<F>(&self, loader: F) -> InspectionResult<Arc<T>>
    where
        F: FnOnce() -> InspectionResult<T>,
    {
        self.cell.get_or_init(|| loader().map(Arc::new)).clone()
    }

    /// Whether a load has been attempted
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for LibraryGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    static ref PROCESS_LIBRARY: LibraryGate<NativeLibrary> = LibraryGate::new();
}

/// The process-wide library, loaded on first call
///
/// Only the first caller's configuration is used for the search.
pub fn process_library(config: &LibraryConfig) -> InspectionResult<Arc<NativeLibrary>> {
    PROCESS_LIBRARY.get_or_load(|| {
        let candidates = library_candidates_for_host(config)?;
        debug!("Searching {} library candidates", candidates.len());
        load_or_fail(&candidates)
    })
}
