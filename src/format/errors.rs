//! Error types for image inspection
//!
//! Every failure the inspector can report maps onto a closed set of kinds with
//! stable string and numeric codes, so callers on the other side of a process
//! or FFI boundary can branch on the kind without parsing messages.

use std::fmt;
use std::io;

/// Inspection error taxonomy
///
/// Variants carry plain data only (no handles or boxed sources), which keeps
/// the type `Clone + Send + Sync` and lets it travel across the C ABI as a
/// status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionError {
    /// Input file or library artifact is missing
    NotFound(String),
    /// Permission or I/O failure while reading bytes
    Unreadable(String),
    /// No artifact mapping exists for the platform/architecture
    UnsupportedPlatform(String),
    /// Fewer bytes than the format's minimum header
    TooSmall { needed: u64, actual: u64 },
    /// No signature matched
    UnknownFormat,
    /// Signature matched but required structure is absent or inconsistent
    MalformedStructure(String),
    /// Declared lengths disagree with the actual length
    SizeMismatch { declared: u64, actual: u64 },
}

/// Closed set of error kinds with stable identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unreadable,
    UnsupportedPlatform,
    TooSmall,
    UnknownFormat,
    MalformedStructure,
    SizeMismatch,
}

impl ErrorKind {
    /// All kinds, in status-code order
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::NotFound,
        ErrorKind::Unreadable,
        ErrorKind::UnsupportedPlatform,
        ErrorKind::TooSmall,
        ErrorKind::UnknownFormat,
        ErrorKind::MalformedStructure,
        ErrorKind::SizeMismatch,
    ];

    /// Stable string identifier used across process boundaries
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unreadable => "unreadable",
            ErrorKind::UnsupportedPlatform => "unsupported_platform",
            ErrorKind::TooSmall => "too_small",
            ErrorKind::UnknownFormat => "unknown_format",
            ErrorKind::MalformedStructure => "malformed_structure",
            ErrorKind::SizeMismatch => "size_mismatch",
        }
    }

    /// Status code used by the C ABI. Zero is reserved for success.
    pub fn status_code(&self) -> i32 {
        match self {
            ErrorKind::NotFound => 1,
            ErrorKind::Unreadable => 2,
            ErrorKind::UnsupportedPlatform => 3,
            ErrorKind::TooSmall => 4,
            ErrorKind::UnknownFormat => 5,
            ErrorKind::MalformedStructure => 6,
            ErrorKind::SizeMismatch => 7,
        }
    }

    /// Looks up a kind by its ABI status code
    pub fn from_status_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.status_code() == code)
    }

    /// Looks up a kind by its string identifier
    pub fn from_code_str(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == code)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InspectionError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            InspectionError::NotFound(_) => ErrorKind::NotFound,
            InspectionError::Unreadable(_) => ErrorKind::Unreadable,
            InspectionError::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            InspectionError::TooSmall { .. } => ErrorKind::TooSmall,
            InspectionError::UnknownFormat => ErrorKind::UnknownFormat,
            InspectionError::MalformedStructure(_) => ErrorKind::MalformedStructure,
            InspectionError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
        }
    }

    /// Stable string code of this error
    pub fn code(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Builds an I/O error with the path that was being accessed
    pub fn from_io(error: &io::Error, context: &str) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => InspectionError::NotFound(context.to_string()),
            _ => InspectionError::Unreadable(format!("{}: {}", context, error)),
        }
    }
}

impl fmt::Display for InspectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionError::NotFound(what) => write!(f, "Not found: {}", what),
            InspectionError::Unreadable(msg) => write!(f, "Unreadable: {}", msg),
            InspectionError::UnsupportedPlatform(msg) => write!(f, "Unsupported platform: {}", msg),
            InspectionError::TooSmall { needed, actual } => {
                write!(f, "Too small: need at least {} bytes, have {}", needed, actual)
            }
            InspectionError::UnknownFormat => write!(f, "Unknown image format"),
            InspectionError::MalformedStructure(msg) => write!(f, "Malformed structure: {}", msg),
            InspectionError::SizeMismatch { declared, actual } => write!(
                f,
                "Size mismatch: structure declares {} bytes, source has {}",
                declared, actual
            ),
        }
    }
}

impl std::error::Error for InspectionError {}

impl From<io::Error> for InspectionError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => InspectionError::NotFound(error.to_string()),
            _ => InspectionError::Unreadable(error.to_string()),
        }
    }
}

/// Result type for inspection operations
pub type InspectionResult<T> = Result<T, InspectionError>;
