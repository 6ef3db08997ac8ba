use snowflux_core::EnergyBalanceError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait SnowFluxError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> SnowFluxErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `SnowFluxError` for FFI error scenarios.
///
/// Wraps a `SnowFluxErrorCode` with its message. Core errors convert into it through
/// `From<EnergyBalanceError>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultSnowFluxError {
    code: SnowFluxErrorCode,
    msg: String,
}

impl DefaultSnowFluxError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"air_tmp"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SnowFluxErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for grid dimensions that are zero or overflow `usize`.
    ///
    /// # Arguments
    /// * `rows` - Requested row count
    /// * `cols` - Requested column count
    pub fn invalid_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            code: SnowFluxErrorCode::InvalidParameter,
            msg: format!("Grid dimensions must be positive and not overflow, got {rows}x{cols}"),
        }
    }
}

impl From<EnergyBalanceError> for DefaultSnowFluxError {
    fn from(error: EnergyBalanceError) -> Self {
        let code = match error {
            EnergyBalanceError::ShapeMismatch { .. } => SnowFluxErrorCode::ShapeMismatch,
            EnergyBalanceError::UnsupportedResolution(_) => {
                SnowFluxErrorCode::UnsupportedResolution
            }
            EnergyBalanceError::ResourceLoad { .. } => SnowFluxErrorCode::ResourceLoad,
            EnergyBalanceError::InvalidGridData { .. } => SnowFluxErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl SnowFluxError for DefaultSnowFluxError {
    fn code(&self) -> SnowFluxErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by snow flux functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnowFluxErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Input or static grids differ in shape.
    ShapeMismatch = 2,

    /// Resolution is not 500 or 30.
    UnsupportedResolution = 3,

    /// Static rasters for the requested resolution were not provided.
    ResourceLoad = 4,

    /// Invalid parameter passed to function.
    InvalidParameter = 5,
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to keep the pointer handed out by `snowflux_get_last_error` valid.
    static LAST_ERROR: RefCell<(Option<CString>, SnowFluxErrorCode)> =
        const { RefCell::new((None, SnowFluxErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SnowFluxErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SnowFluxErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage).
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// SnowFluxErrorCode err = snowflux_evaluate(datasets, &input, &output);
/// if (err != Ok) {
///     const char* error = snowflux_get_last_error();
///     if (error) {
///         printf("Evaluation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn snowflux_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `SnowFluxErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn snowflux_get_last_error_code() -> SnowFluxErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
