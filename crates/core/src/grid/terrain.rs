//! Standard atmosphere pressure derived from the elevation model
//!
//! Snow-17 replaces the observed surface pressure in the wind function and the
//! psychrometric term by a standard atmosphere evaluated at each cell's elevation.

use crate::core_types::Grid;

/// Snow-17 standard atmosphere pressure
///
/// P_A = 33.86 × (29.9 - 0.335·z + 0.00022·z^2.4)
///
/// # Arguments
/// * `elevation` - Elevation in hundreds of meters, as delivered by the elevation raster
///
/// # Returns
/// Standard pressure (mb). Negative elevations give NaN through the fractional power
/// and are passed on unchanged.
///
/// # References
/// Anderson, E.A. (1976). NOAA Technical Report NWS 19, Eq. 5.9
#[inline]
#[must_use]
pub fn standard_atmosphere_pressure(elevation: f64) -> f64 {
    33.86 * (29.9 - 0.335 * elevation + 0.00022 * elevation.powf(2.4))
}

/// Apply [`standard_atmosphere_pressure`] to a whole elevation grid
#[must_use]
pub fn standard_atmosphere_grid(elevation: &Grid) -> Grid {
    elevation.map(standard_atmosphere_pressure)
}
