//! C ABI exported by the `cdylib` build
//!
//! A host process loads the compiled artifact and calls these symbols; the
//! loader in [`crate::binding::loader`] is the Rust-side consumer. Metadata
//! crosses the boundary as a `#[repr(C)]` struct, errors as status codes.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::Path;

use crate::config;
use crate::format::errors::{ErrorKind, InspectionError, InspectionResult};
use crate::format::extractor::ScanLimits;
use crate::format::metadata::ImageMetadata;
use crate::format::signatures::{classify, FormatTag};
use crate::format::validation::dimension_issue;
use crate::format::ImageReader;

/// Version of the exported ABI; bumped on any layout or symbol change
pub const ABI_VERSION: u32 = 2;

/// Status returned when a call produced metadata
pub const STATUS_OK: i32 = 0;

pub(crate) const ABI_VERSION_SYMBOL: &[u8] = b"imgprobe_abi_version\0";
pub(crate) const INSPECT_WITH_LIMITS_SYMBOL: &[u8] = b"imgprobe_inspect_with_limits\0";
pub(crate) const CLASSIFY_SYMBOL: &[u8] = b"imgprobe_classify_bytes\0";

pub(crate) type AbiVersionFn = unsafe extern "C" fn() -> u32;
pub(crate) type InspectWithLimitsFn =
    unsafe extern "C" fn(*const c_char, *const RawScanLimits, *mut RawImageMetadata) -> i32;
pub(crate) type ClassifyFn = unsafe extern "C" fn(*const u8, usize) -> u8;

/// Metadata as it crosses the C ABI
///
/// `issue` holds the status code of a soft validation issue (0 for none).
/// The two length fields also carry the numeric context of `too_small` and
/// `size_mismatch` (needed/declared and actual lengths).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawImageMetadata {
    pub format: u8,
    pub bit_depth: u8,
    pub well_formed: u8,
    pub width: u32,
    pub height: u32,
    pub declared_byte_length: u64,
    pub actual_byte_length: u64,
    pub issue: i32,
}

/// Read limits as they cross the C ABI
///
/// A zero field falls back to the library's default for that limit.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawScanLimits {
    pub max_scan_bytes: u64,
    pub jpeg_scan_window: u64,
}

impl From<ScanLimits> for RawScanLimits {
    fn from(limits: ScanLimits) -> Self {
        RawScanLimits {
            max_scan_bytes: limits.max_scan_bytes,
            jpeg_scan_window: limits.jpeg_scan_window,
        }
    }
}

impl RawScanLimits {
    /// Converts back, filling zero fields from `defaults`
    pub fn to_limits(&self, defaults: ScanLimits) -> ScanLimits {
        let pick = |value: u64, default: u64| if value == 0 { default } else { value };
        ScanLimits {
            max_scan_bytes: pick(self.max_scan_bytes, defaults.max_scan_bytes),
            jpeg_scan_window: pick(self.jpeg_scan_window, defaults.jpeg_scan_window),
        }
    }
}

impl From<&ImageMetadata> for RawImageMetadata {
    fn from(metadata: &ImageMetadata) -> Self {
        let mut raw = RawImageMetadata {
            format: metadata.format().code(),
            bit_depth: metadata.bit_depth(),
            well_formed: metadata.well_formed() as u8,
            width: metadata.width(),
            height: metadata.height(),
            declared_byte_length: metadata.declared_byte_length(),
            actual_byte_length: 0,
            issue: 0,
        };
        if let Some(issue) = metadata.issue() {
            raw.issue = issue.kind().status_code();
            if let InspectionError::SizeMismatch { actual, .. } = issue {
                raw.actual_byte_length = *actual;
            }
        }
        raw
    }
}

/// Encodes an inspection result as a status code and raw struct
pub fn encode_result(result: &InspectionResult<ImageMetadata>) -> (i32, RawImageMetadata) {
    match result {
        Ok(metadata) => (STATUS_OK, RawImageMetadata::from(metadata)),
        Err(error) => {
            let mut raw = RawImageMetadata::default();
            match error {
                InspectionError::TooSmall { needed, actual } => {
                    raw.declared_byte_length = *needed;
                    raw.actual_byte_length = *actual;
                }
                InspectionError::SizeMismatch { declared, actual } => {
                    raw.declared_byte_length = *declared;
                    raw.actual_byte_length = *actual;
                }
                _ => {}
            }
            (error.kind().status_code(), raw)
        }
    }
}

/// Decodes a status code and raw struct back into an inspection result
///
/// Message text does not cross the boundary; string-carrying variants are
/// rebuilt from `context` (typically the inspected path).
pub fn decode_result(status: i32, raw: &RawImageMetadata, context: &str) -> InspectionResult<ImageMetadata> {
    if status == STATUS_OK {
        let issue = match raw.issue {
            0 => None,
            code => Some(decode_issue(code, raw, context)),
        };
        return Ok(ImageMetadata::from_parts(
            FormatTag::from_code(raw.format),
            raw.width,
            raw.height,
            raw.bit_depth,
            raw.declared_byte_length,
            raw.well_formed != 0,
            issue,
        ));
    }
    Err(decode_error(status, raw, context))
}

/// Soft issues are rebuilt from the raw fields alone
fn decode_issue(code: i32, raw: &RawImageMetadata, context: &str) -> InspectionError {
    match ErrorKind::from_status_code(code) {
        // Out-of-range dimensions are the only structural issue validation attaches
        Some(ErrorKind::MalformedStructure) => dimension_issue(raw.width, raw.height),
        _ => decode_error(code, raw, context),
    }
}

fn decode_error(code: i32, raw: &RawImageMetadata, context: &str) -> InspectionError {
    match ErrorKind::from_status_code(code) {
        Some(ErrorKind::NotFound) => InspectionError::NotFound(context.to_string()),
        Some(ErrorKind::Unreadable) => InspectionError::Unreadable(context.to_string()),
        Some(ErrorKind::UnsupportedPlatform) => InspectionError::UnsupportedPlatform(context.to_string()),
        Some(ErrorKind::TooSmall) => InspectionError::TooSmall {
            needed: raw.declared_byte_length,
            actual: raw.actual_byte_length,
        },
        Some(ErrorKind::UnknownFormat) => InspectionError::UnknownFormat,
        Some(ErrorKind::MalformedStructure) => InspectionError::MalformedStructure(context.to_string()),
        Some(ErrorKind::SizeMismatch) => InspectionError::SizeMismatch {
            declared: raw.declared_byte_length,
            actual: raw.actual_byte_length,
        },
        None => InspectionError::Unreadable(format!("{}: unexpected status {}", context, code)),
    }
}

/// Inspects a path with the process default limits
pub fn inspect_to_raw(path: &Path) -> (i32, RawImageMetadata) {
    inspect_to_raw_with_limits(path, config::default_config().limits)
}

/// Inspects a path with caller-supplied limits
pub fn inspect_to_raw_with_limits(path: &Path, limits: ScanLimits) -> (i32, RawImageMetadata) {
    encode_result(&ImageReader::new(limits).load(path))
}

/// Reports the ABI version of this library
#[no_mangle]
pub extern "C" fn imgprobe_abi_version() -> u32 {
    ABI_VERSION
}

/// Inspects the image at `path`, writing metadata to `out`
///
/// Returns 0 when metadata was produced (soft issues are reported in
/// `out.issue`), otherwise the error's status code.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string, and `out` must be
/// null or point to memory writable as one `RawImageMetadata`.
#[no_mangle]
pub unsafe extern "C" fn imgprobe_inspect(path: *const c_char, out: *mut RawImageMetadata) -> i32 {
    imgprobe_inspect_with_limits(path, std::ptr::null(), out)
}

/// Like [`imgprobe_inspect`], reading no more than `limits` allows
///
/// A null `limits` uses the library defaults.
///
/// # Safety
/// As for [`imgprobe_inspect`]; `limits` must be null or point to a readable
/// `RawScanLimits`.
#[no_mangle]
pub unsafe extern "C" fn imgprobe_inspect_with_limits(
    path: *const c_char,
    limits: *const RawScanLimits,
    out: *mut RawImageMetadata,
) -> i32 {
    if path.is_null() || out.is_null() {
        return ErrorKind::Unreadable.status_code();
    }

    let defaults = config::default_config().limits;
    let limits = match limits.as_ref() {
        Some(raw) => raw.to_limits(defaults),
        None => defaults,
    };
    let (status, raw) = match CStr::from_ptr(path).to_str() {
        Ok(path) => inspect_to_raw_with_limits(Path::new(path), limits),
        Err(_) => (ErrorKind::Unreadable.status_code(), RawImageMetadata::default()),
    };
    out.write(raw);
    status
}

/// Classifies the leading bytes of a buffer, returning a format code
///
/// # Safety
/// `data` must be null or valid for reads of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn imgprobe_classify_bytes(data: *const u8, len: usize) -> u8 {
    if data.is_null() {
        return FormatTag::Unknown.code();
    }
    let bytes = std::slice::from_raw_parts(data, len);
    classify(bytes).code()
}
