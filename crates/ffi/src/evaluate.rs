use snowflux_core::{relative_humidity_grid, EnergyBalance, Grid, MeteorologicalForcing};

use crate::datasets::SnowFluxDatasets;
use crate::error::{DefaultSnowFluxError, SnowFluxErrorCode};
use crate::helpers::{cell_count, track_error, track_result};

/// Meteorological forcing for one evaluation.
///
/// Every array is row-major with `rows * cols` elements and must match the shape of the
/// static rasters registered for `resolution`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SnowFluxInput {
    pub rows: usize,
    pub cols: usize,
    /// Air temperature (°C)
    pub air_tmp: *const f64,
    /// Snow surface temperature (°C)
    pub snow_tmp: *const f64,
    /// Air pressure (Pa)
    pub pres: *const f64,
    /// Specific humidity (kg/kg)
    pub spfh: *const f64,
    /// Wind speed (m/s)
    pub wind: *const f64,
    /// Downwelling longwave (W/m²)
    pub dlw: *const f64,
    /// Static raster resolution in meters, 500 or 30
    pub resolution: u32,
}

/// Caller-allocated output buffers, each holding `rows * cols` elements.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SnowFluxOutput {
    pub latent_heat: *mut f64,
    pub sensible_heat: *mut f64,
    pub canopy_downwelling_longwave: *mut f64,
    pub upwelling_longwave: *mut f64,
}

/// # Safety
/// `data` must reference `len` readable values when non-null.
unsafe fn read_grid(
    name: &str,
    data: *const f64,
    rows: usize,
    cols: usize,
    len: usize,
) -> Result<Grid, DefaultSnowFluxError> {
    if data.is_null() {
        return Err(DefaultSnowFluxError::null_pointer(name));
    }
    let values = unsafe { std::slice::from_raw_parts(data, len) }.to_vec();
    Ok(Grid::from_vec(rows, cols, values)?)
}

/// # Safety
/// `out` must reference `grid.len()` writable values when non-null.
unsafe fn write_grid(grid: &Grid, out: *mut f64) {
    if !out.is_null() {
        unsafe { std::slice::from_raw_parts_mut(out, grid.len()) }
            .copy_from_slice(grid.as_slice());
    }
}

impl SnowFluxInput {
    /// # Safety
    /// Non-null pointers must satisfy the `SnowFluxInput` contract.
    unsafe fn to_forcing(&self) -> Result<MeteorologicalForcing, DefaultSnowFluxError> {
        let (rows, cols) = (self.rows, self.cols);
        let len = cell_count(rows, cols)?;
        unsafe {
            Ok(MeteorologicalForcing {
                air_tmp: read_grid("air_tmp", self.air_tmp, rows, cols, len)?,
                snow_tmp: read_grid("snow_tmp", self.snow_tmp, rows, cols, len)?,
                pres: read_grid("pres", self.pres, rows, cols, len)?,
                spfh: read_grid("spfh", self.spfh, rows, cols, len)?,
                wind: read_grid("wind", self.wind, rows, cols, len)?,
                dlw: read_grid("dlw", self.dlw, rows, cols, len)?,
            })
        }
    }
}

/// Evaluate the four energy-balance grids for one time step.
///
/// Output buffers that are null are skipped, so callers can request a subset of the
/// fluxes. Nothing is written unless the evaluation succeeds.
///
/// Returns
/// - `SnowFluxErrorCode::Ok` (0): outputs written
/// - `SnowFluxErrorCode::NullPointer`: a handle, struct or input array pointer is null
/// - `SnowFluxErrorCode::InvalidParameter`: `rows * cols` is zero or overflows
/// - `SnowFluxErrorCode::UnsupportedResolution`: `input.resolution` is not 500 or 30
/// - `SnowFluxErrorCode::ResourceLoad`: no rasters were provided for the resolution
/// - `SnowFluxErrorCode::ShapeMismatch`: forcing and static rasters differ in shape
///
/// # Safety
/// - `datasets` must be a live handle from `snowflux_datasets_new`.
/// - `input` and `output` must point to valid structs whose non-null arrays hold
///   `input.rows * input.cols` elements.
#[no_mangle]
pub unsafe extern "C" fn snowflux_evaluate(
    datasets: *const SnowFluxDatasets,
    input: *const SnowFluxInput,
    output: *const SnowFluxOutput,
) -> SnowFluxErrorCode {
    let Some(datasets) = (unsafe { datasets.as_ref() }) else {
        return track_error(&DefaultSnowFluxError::null_pointer("datasets"));
    };
    let Some(input) = (unsafe { input.as_ref() }) else {
        return track_error(&DefaultSnowFluxError::null_pointer("input"));
    };
    let Some(output) = (unsafe { output.as_ref() }) else {
        return track_error(&DefaultSnowFluxError::null_pointer("output"));
    };

    let result = unsafe { input.to_forcing() }.and_then(|forcing| {
        EnergyBalance::evaluate_at(&forcing, &datasets.inner, input.resolution)
            .map_err(DefaultSnowFluxError::from)
    });

    match track_result(result) {
        Ok(balance) => {
            let fluxes = balance.fluxes();
            unsafe {
                write_grid(&fluxes.latent_heat, output.latent_heat);
                write_grid(&fluxes.sensible_heat, output.sensible_heat);
                write_grid(
                    &fluxes.canopy_downwelling_longwave,
                    output.canopy_downwelling_longwave,
                );
                write_grid(&fluxes.upwelling_longwave, output.upwelling_longwave);
            }
            SnowFluxErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Relative humidity (%) from air temperature (°C), pressure (Pa) and specific humidity.
///
/// Does not require static datasets.
///
/// # Safety
/// All four pointers must be non-null and reference `rows * cols` elements; `out` must
/// be writable.
#[no_mangle]
pub unsafe extern "C" fn snowflux_relative_humidity(
    rows: usize,
    cols: usize,
    air_tmp: *const f64,
    pres: *const f64,
    spfh: *const f64,
    out: *mut f64,
) -> SnowFluxErrorCode {
    if out.is_null() {
        return track_error(&DefaultSnowFluxError::null_pointer("out"));
    }

    let result = cell_count(rows, cols).and_then(|len| unsafe {
        let air_tmp = read_grid("air_tmp", air_tmp, rows, cols, len)?;
        let pres = read_grid("pres", pres, rows, cols, len)?;
        let spfh = read_grid("spfh", spfh, rows, cols, len)?;
        Ok(relative_humidity_grid(&air_tmp, &pres, &spfh)?)
    });

    match track_result(result) {
        Ok(rh) => {
            unsafe { write_grid(&rh, out) };
            SnowFluxErrorCode::Ok
        }
        Err(code) => code,
    }
}
