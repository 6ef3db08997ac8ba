//! Snow Surface Energy Balance Core Library
//!
//! Computes the energy-balance terms of a snowpack over a spatial grid from gridded
//! meteorological forcing and static elevation/vegetation data, following the Snow-17
//! wind function and the Liston et al. (1999) bulk aerodynamic formulation.
//!
//! ## Outputs
//!
//! - Latent heat flux (LH)
//! - Sensible heat flux (SH)
//! - Canopy-corrected downwelling longwave (CDLW)
//! - Upwelling longwave (ULW)
//!
//! ## Usage
//!
//! ```
//! use snowflux_core::{
//!     CellForcing, EnergyBalance, Grid, InMemoryRasterSource, MeteorologicalForcing,
//!     Resolution, StaticDatasets,
//! };
//!
//! let datasets = StaticDatasets::new(InMemoryRasterSource::new().with_resolution(
//!     Resolution::M500,
//!     Grid::filled(2, 2, 15.0), // elevation, hundreds of meters
//!     Grid::filled(2, 2, 35.0), // forest density, percent
//! ));
//! let forcing = MeteorologicalForcing::uniform(2, 2, &CellForcing {
//!     air_tmp: -3.0,
//!     snow_tmp: -5.0,
//!     pres: 85_000.0,
//!     spfh: 0.002,
//!     wind: 3.0,
//!     dlw: 230.0,
//! });
//!
//! let balance = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500)?;
//! assert!(balance.fluxes().sensible_heat.get(0, 0) > 0.0);
//! # Ok::<(), snowflux_core::EnergyBalanceError>(())
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Physics and grid evaluation
pub mod energy_balance;
pub mod grid;
pub mod physics;

// Re-export core types
pub use core_types::{Grid, Resolution, Shape};
pub use error::{BoxError, Dataset, EnergyBalanceError, Result};

// Re-export evaluator types
pub use energy_balance::{
    evaluate_batch, evaluate_cell, relative_humidity_grid, CellFluxes, CellForcing, Diagnostics,
    EnergyBalance, FluxGrids, MeteorologicalForcing,
};
pub use grid::{InMemoryRasterSource, RasterSource, StaticDatasets, StaticGrids};
