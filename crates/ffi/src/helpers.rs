use crate::error::{with_last_error_mut, DefaultSnowFluxError, SnowFluxError, SnowFluxErrorCode};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `SnowFluxError` trait.
pub(crate) fn set_last_error(error: &impl SnowFluxError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl SnowFluxError) -> SnowFluxErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of a fallible operation.
///
/// Clears the last error on success; on failure stores it and yields its code.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultSnowFluxError>,
) -> Result<T, SnowFluxErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SnowFluxErrorCode::Ok;
    });
}

/// Checked `rows * cols`, rejecting empty grids.
pub(crate) fn cell_count(rows: usize, cols: usize) -> Result<usize, DefaultSnowFluxError> {
    match rows.checked_mul(cols) {
        Some(len) if len > 0 => Ok(len),
        _ => Err(DefaultSnowFluxError::invalid_dimensions(rows, cols)),
    }
}
