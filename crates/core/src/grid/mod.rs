//! Static per-resolution grids and the raster collaborator interface

pub mod canopy;
pub mod static_data;
pub mod terrain;

// Re-export main types
pub use canopy::forest_fraction_from_density;
pub use static_data::{InMemoryRasterSource, RasterSource, StaticDatasets, StaticGrids};
pub use terrain::{standard_atmosphere_grid, standard_atmosphere_pressure};
