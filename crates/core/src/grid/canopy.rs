//! Forest canopy fraction from the forest-density raster

use crate::core_types::Grid;

/// Forest density rasters store percent cover
const PERCENT: f64 = 100.0;

/// Convert forest density (percent, 0-100) to canopy fraction F_c (0-1)
///
/// Values outside 0-100 are converted as is.
#[must_use]
pub fn forest_fraction_from_density(density_percent: &Grid) -> Grid {
    density_percent.map(|d| d / PERCENT)
}
