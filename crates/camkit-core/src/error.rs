//! Error types and integer result codes.
//!
//! Every fallible operation in camkit returns [`CamResult`]. Each
//! [`CamError`] maps onto a stable integer result code via [`CamError::code`]
//! so that callers which only carry integers (logs, FFI shims, scripts) can
//! still classify failures.
//!
//! ## Code ranges
//!
//! - `0` is success.
//! - Small negative codes (`-1` .. `-999`) are generic and shared by every
//!   driver. [`result_as_string`] translates them.
//! - Codes at or below [`code::DRIVER_ERROR_THRESHOLD`] (`-1000`) belong to
//!   whichever driver produced them. Only that driver can describe them, which
//!   is why the session-level translator routes them back to the bound driver.

use thiserror::Error;

use crate::driver::Operation;

// =============================================================================
// Result Codes
// =============================================================================

/// Stable integer result codes.
pub mod code {
    /// Success.
    pub const OK: i32 = 0;
    /// Unspecified failure.
    pub const ERROR: i32 = -1;
    /// A required argument was missing or invalid.
    pub const BAD_PARAMETERS: i32 = -2;
    /// Allocation failed.
    pub const NO_MEMORY: i32 = -3;
    /// A driver library could not be loaded.
    pub const LIBRARY: i32 = -4;
    /// The bound driver does not provide the requested operation.
    pub const NOT_SUPPORTED: i32 = -6;
    /// Input/output failure.
    pub const IO: i32 = -7;
    /// No capability record matches the requested model.
    pub const MODEL_NOT_FOUND: i32 = -105;
    /// Folder missing or not specified.
    pub const DIRECTORY_NOT_FOUND: i32 = -107;
    /// File missing or not specified.
    pub const FILE_NOT_FOUND: i32 = -108;
    /// Codes at or below this value are driver-specific.
    pub const DRIVER_ERROR_THRESHOLD: i32 = -1000;
}

/// Returns true if `code` lies in the driver-specific range.
#[must_use]
pub fn is_driver_code(code: i32) -> bool {
    code <= code::DRIVER_ERROR_THRESHOLD
}

/// Translate a generic result code into human-readable text.
///
/// Driver-specific codes get a placeholder here; use the session-level
/// translator to reach the driver's own descriptions.
#[must_use]
pub fn result_as_string(result: i32) -> &'static str {
    match result {
        code::OK => "No error",
        code::ERROR => "Unspecified error",
        code::BAD_PARAMETERS => "Bad parameters",
        code::NO_MEMORY => "Out of memory",
        code::LIBRARY => "Error loading a library",
        code::NOT_SUPPORTED => "Unsupported operation",
        code::IO => "I/O problem",
        code::MODEL_NOT_FOUND => "Unknown model",
        code::DIRECTORY_NOT_FOUND => "Directory not found",
        code::FILE_NOT_FOUND => "File not found",
        c if is_driver_code(c) => "Unknown camera library error",
        _ => "Unknown error",
    }
}

// =============================================================================
// Driver Errors
// =============================================================================

/// A failure reported by a driver in its own code space.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Driver '{library}' error {code}: {message}")]
pub struct DriverError {
    /// Library name of the driver that raised the error.
    pub library: String,
    /// Driver-specific code; expected to be at or below
    /// [`code::DRIVER_ERROR_THRESHOLD`].
    pub code: i32,
    /// Driver-supplied description.
    pub message: String,
}

impl DriverError {
    /// Error raised by `library`.
    #[must_use]
    pub fn new(library: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            code,
            message: message.into(),
        }
    }
}

/// Failure to load a driver library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No loader knows a library by this name.
    #[error("No driver library named '{0}' is available")]
    UnknownLibrary(String),

    /// The library exists but could not produce an operation table.
    #[error("Failed to load driver library '{library}': {message}")]
    Failed {
        /// Library that failed.
        library: String,
        /// Why it failed.
        message: String,
    },
}

// =============================================================================
// CamError
// =============================================================================

/// Primary error type for camera sessions and drivers.
#[derive(Error, Debug)]
pub enum CamError {
    /// A required value was missing or malformed.
    ///
    /// Raised during binding when neither a port path nor a resolvable port
    /// name was configured, when no model was set, and when a port setter is
    /// called on a bound session.
    #[error("Bad parameters: {0}")]
    InvalidArgument(String),

    /// The capability registry has no record for this model name.
    #[error("Unknown model: {0}")]
    ModelNotFound(String),

    /// The bound driver does not provide this operation, or no driver is bound.
    #[error("Unsupported operation: {0}")]
    NotSupported(Operation),

    /// A folder identifier was empty or does not exist.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// A file identifier was empty or does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Allocation failed.
    #[error("Out of memory")]
    OutOfMemory,

    /// The driver library could not be loaded.
    #[error(transparent)]
    Library(#[from] LoadError),

    /// The driver reported a failure in its own code space.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Filesystem or transport failure.
    #[error("I/O problem: {0}")]
    Io(#[from] std::io::Error),

    /// Broken internal assumption; indicates a bug rather than bad input.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CamError {
    /// Shorthand for [`CamError::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CamError::InvalidArgument(message.into())
    }

    /// Integer result code for this error.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            CamError::InvalidArgument(_) => code::BAD_PARAMETERS,
            CamError::ModelNotFound(_) => code::MODEL_NOT_FOUND,
            CamError::NotSupported(_) => code::NOT_SUPPORTED,
            CamError::DirectoryNotFound(_) => code::DIRECTORY_NOT_FOUND,
            CamError::FileNotFound(_) => code::FILE_NOT_FOUND,
            CamError::OutOfMemory => code::NO_MEMORY,
            CamError::Library(_) => code::LIBRARY,
            CamError::Driver(err) => err.code,
            CamError::Io(_) => code::IO,
            CamError::Internal(_) => code::ERROR,
        }
    }

    /// Whether this is [`CamError::NotSupported`].
    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, CamError::NotSupported(_))
    }
}

/// Result alias used throughout camkit.
pub type CamResult<T> = std::result::Result<T, CamError>;
