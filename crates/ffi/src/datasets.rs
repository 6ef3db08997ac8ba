use snowflux_core::{Grid, InMemoryRasterSource, Resolution, StaticDatasets};
use std::ptr;

use crate::error::{DefaultSnowFluxError, SnowFluxErrorCode};
use crate::helpers::{cell_count, track_error, track_result};

/// Static rasters for one resolution, borrowed from the caller.
///
/// Both arrays are row-major with `rows * cols` elements. Elevation is in hundreds of
/// meters, forest density in percent. The data is copied during `snowflux_datasets_new`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SnowFluxRaster {
    pub rows: usize,
    pub cols: usize,
    pub elevation: *const f64,
    pub forest_density: *const f64,
}

impl SnowFluxRaster {
    /// Copy both rasters into owned grids.
    ///
    /// # Safety
    /// Non-null pointers must reference `rows * cols` readable `f64` values.
    unsafe fn to_grids(&self) -> Result<(Grid, Grid), DefaultSnowFluxError> {
        if self.elevation.is_null() {
            return Err(DefaultSnowFluxError::null_pointer("elevation"));
        }
        if self.forest_density.is_null() {
            return Err(DefaultSnowFluxError::null_pointer("forest_density"));
        }
        let len = cell_count(self.rows, self.cols)?;

        let (elevation, forest_density) = unsafe {
            (
                std::slice::from_raw_parts(self.elevation, len).to_vec(),
                std::slice::from_raw_parts(self.forest_density, len).to_vec(),
            )
        };

        Ok((
            Grid::from_vec(self.rows, self.cols, elevation)?,
            Grid::from_vec(self.rows, self.cols, forest_density)?,
        ))
    }
}

/// Shared static datasets handle.
///
/// Holds the registered rasters and the lazily derived static grids for both
/// resolutions. Derived grids are computed on first use and reused afterwards.
///
/// # Thread Safety
/// The handle is read-only after creation. Concurrent `snowflux_evaluate` calls on the
/// same handle are safe; the first caller for a resolution performs the load.
pub struct SnowFluxDatasets {
    pub(crate) inner: StaticDatasets<InMemoryRasterSource>,
}

impl SnowFluxDatasets {
    /// # Safety
    /// Non-null raster pointers must satisfy the `SnowFluxRaster` contract.
    pub(crate) unsafe fn new(
        raster_500m: *const SnowFluxRaster,
        raster_30m: *const SnowFluxRaster,
    ) -> Result<Box<Self>, DefaultSnowFluxError> {
        let mut source = InMemoryRasterSource::new();

        let rasters = [(Resolution::M500, raster_500m), (Resolution::M30, raster_30m)];
        for (resolution, raster) in rasters {
            // A null raster leaves that resolution unavailable
            if let Some(raster) = unsafe { raster.as_ref() } {
                let (elevation, forest_density) = unsafe { raster.to_grids()? };
                source = source.with_resolution(resolution, elevation, forest_density);
            }
        }

        Ok(Box::new(Self {
            inner: StaticDatasets::new(source),
        }))
    }
}

/// Create a static datasets handle and return it via out-parameter.
///
/// Parameters
/// - `raster_500m`: Rasters for the 500 m resolution, or null if unavailable.
/// - `raster_30m`: Rasters for the 30 m resolution, or null if unavailable.
/// - `out_datasets`: Pointer to receive the created handle. Must be non-null.
///   - On success: set to a valid `SnowFluxDatasets` pointer
///   - On failure: set to null
///
/// Evaluating at a resolution whose raster was null fails with `ResourceLoad`.
///
/// Returns
/// - `SnowFluxErrorCode::Ok` (0): success
/// - `SnowFluxErrorCode::NullPointer`: `out_datasets` or a raster data pointer is null
/// - `SnowFluxErrorCode::InvalidParameter`: raster dimensions are zero or overflow
///
/// # Safety
///
/// - `out_datasets` must be a valid, non-null pointer to writable memory.
/// - Non-null raster pointers must point to valid `SnowFluxRaster` values whose data
///   pointers reference `rows * cols` readable `f64` values. The data is copied.
/// - The caller takes ownership of the returned handle and MUST call
///   `snowflux_datasets_destroy` exactly once.
///
/// Example (C)
/// ```c
/// SnowFluxRaster r500 = { rows, cols, elevation, forest_density };
/// SnowFluxDatasets* datasets = NULL;
/// if (snowflux_datasets_new(&r500, NULL, &datasets) != Ok) {
///     fprintf(stderr, "%s\n", snowflux_get_last_error());
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn snowflux_datasets_new(
    raster_500m: *const SnowFluxRaster,
    raster_30m: *const SnowFluxRaster,
    out_datasets: *mut *mut SnowFluxDatasets,
) -> SnowFluxErrorCode {
    if out_datasets.is_null() {
        return track_error(&DefaultSnowFluxError::null_pointer("out_datasets"));
    }

    match track_result(unsafe { SnowFluxDatasets::new(raster_500m, raster_30m) }) {
        Ok(datasets) => {
            unsafe {
                *out_datasets = Box::into_raw(datasets);
            }
            SnowFluxErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_datasets = ptr::null_mut();
            }
            code
        }
    }
}

/// Load the static grids for `resolution` ahead of the first evaluation.
///
/// Returns
/// - `SnowFluxErrorCode::Ok` (0): grids are loaded
/// - `SnowFluxErrorCode::NullPointer`: `datasets` is null
/// - `SnowFluxErrorCode::UnsupportedResolution`: `resolution` is not 500 or 30
/// - `SnowFluxErrorCode::ResourceLoad`: no rasters were provided for `resolution`
/// - `SnowFluxErrorCode::ShapeMismatch`: elevation and forest density differ in shape
///
/// # Safety
/// `datasets` must be null or a live handle from `snowflux_datasets_new`.
#[no_mangle]
pub unsafe extern "C" fn snowflux_datasets_preload(
    datasets: *const SnowFluxDatasets,
    resolution: u32,
) -> SnowFluxErrorCode {
    let Some(datasets) = (unsafe { datasets.as_ref() }) else {
        return track_error(&DefaultSnowFluxError::null_pointer("datasets"));
    };

    let result = Resolution::try_from(resolution)
        .and_then(|resolution| datasets.inner.preload(resolution))
        .map_err(DefaultSnowFluxError::from);

    match track_result(result) {
        Ok(()) => SnowFluxErrorCode::Ok,
        Err(code) => code,
    }
}

/// Destroys a datasets handle previously created by `snowflux_datasets_new`.
///
/// If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `snowflux_datasets_new`.
/// - The pointer MUST NOT have been freed already.
/// - No evaluation may be using the handle concurrently.
#[no_mangle]
pub unsafe extern "C" fn snowflux_datasets_destroy(ptr: *mut SnowFluxDatasets) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: `ptr` came from `Box::into_raw` in `snowflux_datasets_new`.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
