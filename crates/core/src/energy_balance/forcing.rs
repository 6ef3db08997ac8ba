//! Meteorological inputs for one evaluation

use crate::core_types::{Grid, Shape};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Meteorological values for a single cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellForcing {
    /// Air temperature (°C)
    pub air_tmp: f64,
    /// Snow surface temperature (°C)
    pub snow_tmp: f64,
    /// Air pressure (Pa)
    pub pres: f64,
    /// Specific humidity (kg/kg)
    pub spfh: f64,
    /// Wind speed (m/s)
    pub wind: f64,
    /// Downwelling longwave radiation (W/m²)
    pub dlw: f64,
}

/// Gridded meteorological forcing for one time step
///
/// All six grids must share the same shape; [`MeteorologicalForcing::validate`] checks
/// this before any computation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorologicalForcing {
    /// Air temperature (°C)
    pub air_tmp: Grid,
    /// Snow surface temperature (°C)
    pub snow_tmp: Grid,
    /// Air pressure (Pa)
    pub pres: Grid,
    /// Specific humidity (kg/kg)
    pub spfh: Grid,
    /// Wind speed (m/s)
    pub wind: Grid,
    /// Downwelling longwave radiation (W/m²)
    pub dlw: Grid,
}

impl MeteorologicalForcing {
    /// Forcing with every cell set to `cell`
    #[must_use]
    pub fn uniform(rows: usize, cols: usize, cell: &CellForcing) -> Self {
        Self {
            air_tmp: Grid::filled(rows, cols, cell.air_tmp),
            snow_tmp: Grid::filled(rows, cols, cell.snow_tmp),
            pres: Grid::filled(rows, cols, cell.pres),
            spfh: Grid::filled(rows, cols, cell.spfh),
            wind: Grid::filled(rows, cols, cell.wind),
            dlw: Grid::filled(rows, cols, cell.dlw),
        }
    }

    /// Check that all six grids share the air temperature grid's shape
    ///
    /// # Errors
    ///
    /// Returns [`EnergyBalanceError::ShapeMismatch`](crate::EnergyBalanceError::ShapeMismatch)
    /// naming the first grid that differs.
    pub fn validate(&self) -> Result<Shape> {
        let shape = self.air_tmp.shape();
        self.snow_tmp.ensure_shape("snow_tmp", shape)?;
        self.pres.ensure_shape("pres", shape)?;
        self.spfh.ensure_shape("spfh", shape)?;
        self.wind.ensure_shape("wind", shape)?;
        self.dlw.ensure_shape("dlw", shape)?;
        Ok(shape)
    }

    /// Values of all six grids at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds for any grid
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> CellForcing {
        CellForcing {
            air_tmp: self.air_tmp.get(row, col),
            snow_tmp: self.snow_tmp.get(row, col),
            pres: self.pres.get(row, col),
            spfh: self.spfh.get(row, col),
            wind: self.wind.get(row, col),
            dlw: self.dlw.get(row, col),
        }
    }
}
