//! Native binding surface
//!
//! Artifact naming, the exported C ABI, the dynamic loader and the
//! backends that sit in front of them.

pub mod artifact;
pub mod backend;
pub mod ffi;
pub mod loader;

pub use artifact::{resolve_library_artifact, resolve_module_artifact, Arch, Platform};
pub use backend::{BackendKind, DynamicBackend, InProcessBackend, Inspector, MockBackend};
pub use ffi::{RawImageMetadata, RawScanLimits};
pub use loader::{library_candidates, load_or_fail, LibraryGate, NativeLibrary};
