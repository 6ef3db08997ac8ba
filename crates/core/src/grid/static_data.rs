//! Resolution-keyed static datasets
//!
//! The evaluator needs two grids that never change during a run: the canopy fraction
//! and the standard atmosphere pressure. Both are derived from rasters supplied by a
//! [`RasterSource`]. [`StaticDatasets`] loads them on first use for each resolution,
//! caches the result and hands out shared read-only references.

use crate::core_types::{Grid, Resolution, Shape};
use crate::error::{BoxError, Dataset, EnergyBalanceError, Result};
use crate::grid::{forest_fraction_from_density, standard_atmosphere_grid};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Provider of the static rasters backing each resolution
///
/// Implementations wrap whatever raster I/O the caller uses. Errors are reported
/// unchanged through [`EnergyBalanceError::ResourceLoad`] and never retried.
pub trait RasterSource: Send + Sync {
    /// Elevation grid, in hundreds of meters, for `resolution`
    ///
    /// # Errors
    ///
    /// Any failure to open or read the raster.
    fn elevation(&self, resolution: Resolution) -> std::result::Result<Grid, BoxError>;

    /// Forest density grid, in percent cover, for `resolution`
    ///
    /// # Errors
    ///
    /// Any failure to open or read the raster.
    fn forest_density(&self, resolution: Resolution) -> std::result::Result<Grid, BoxError>;
}

/// Raster source holding grids that are already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRasterSource {
    /// `(elevation, forest_density)` per resolution slot
    rasters: [Option<(Grid, Grid)>; 2],
}

impl InMemoryRasterSource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rasters for one resolution, replacing any previous pair
    ///
    /// # Arguments
    /// * `resolution` - Resolution the rasters belong to
    /// * `elevation` - Elevation in hundreds of meters
    /// * `forest_density` - Forest cover in percent
    #[must_use]
    pub fn with_resolution(
        mut self,
        resolution: Resolution,
        elevation: Grid,
        forest_density: Grid,
    ) -> Self {
        self.rasters[resolution.index()] = Some((elevation, forest_density));
        self
    }

    fn pair(&self, resolution: Resolution) -> std::result::Result<&(Grid, Grid), BoxError> {
        self.rasters[resolution.index()]
            .as_ref()
            .ok_or_else(|| format!("no rasters registered for {resolution}").into())
    }
}

impl RasterSource for InMemoryRasterSource {
    fn elevation(&self, resolution: Resolution) -> std::result::Result<Grid, BoxError> {
        self.pair(resolution).map(|(elevation, _)| elevation.clone())
    }

    fn forest_density(&self, resolution: Resolution) -> std::result::Result<Grid, BoxError> {
        self.pair(resolution).map(|(_, density)| density.clone())
    }
}

/// Static grids for one resolution, shared read-only between evaluations
#[derive(Debug, Clone, PartialEq)]
pub struct StaticGrids {
    /// Resolution these grids belong to
    pub resolution: Resolution,
    /// Canopy fraction F_c (0-1)
    pub forest_fraction: Grid,
    /// Standard atmosphere pressure P_A (mb)
    pub standard_pressure: Grid,
}

impl StaticGrids {
    /// Build the static grids from raw raster values
    ///
    /// # Errors
    ///
    /// Returns [`EnergyBalanceError::ShapeMismatch`] if the two rasters differ in shape.
    pub fn from_rasters(
        resolution: Resolution,
        elevation: &Grid,
        forest_density: &Grid,
    ) -> Result<Self> {
        forest_density.ensure_shape("forest_density", elevation.shape())?;
        Ok(Self {
            resolution,
            forest_fraction: forest_fraction_from_density(forest_density),
            standard_pressure: standard_atmosphere_grid(elevation),
        })
    }

    /// Shared grid shape
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.standard_pressure.shape()
    }
}

/// Immutable, lazily populated store of [`StaticGrids`] per resolution
///
/// Constructed once at startup and passed by reference to every evaluation. Each
/// resolution is loaded at most once on the happy path; if two threads race on the
/// first load, the first stored result wins and the other is dropped.
#[derive(Debug)]
pub struct StaticDatasets<S> {
    source: S,
    cache: [OnceLock<Arc<StaticGrids>>; 2],
}

impl<S: RasterSource> StaticDatasets<S> {
    /// Wrap a raster source. Nothing is loaded until first requested.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: [OnceLock::new(), OnceLock::new()],
        }
    }

    /// The underlying raster source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// True once the grids for `resolution` are cached
    pub fn is_loaded(&self, resolution: Resolution) -> bool {
        self.cache[resolution.index()].get().is_some()
    }

    /// Static grids for `resolution`, loading them on first use
    ///
    /// # Errors
    ///
    /// Returns [`EnergyBalanceError::ResourceLoad`] if the raster source fails, or
    /// [`EnergyBalanceError::ShapeMismatch`] if its rasters disagree in shape.
    /// A failed load is not cached; the next call asks the source again.
    pub fn grids(&self, resolution: Resolution) -> Result<Arc<StaticGrids>> {
        let slot = &self.cache[resolution.index()];
        if let Some(grids) = slot.get() {
            debug!("Static grids for {} served from cache", resolution);
            return Ok(Arc::clone(grids));
        }

        let loaded = Arc::new(self.load(resolution)?);
        let (rows, cols) = loaded.shape();
        info!(
            "Loaded static grids for {}: {}x{} cells",
            resolution, rows, cols
        );
        Ok(Arc::clone(slot.get_or_init(|| loaded)))
    }

    /// Load the grids for `resolution` now instead of on first evaluation
    ///
    /// # Errors
    ///
    /// Same as [`StaticDatasets::grids`].
    pub fn preload(&self, resolution: Resolution) -> Result<()> {
        self.grids(resolution).map(|_| ())
    }

    fn load(&self, resolution: Resolution) -> Result<StaticGrids> {
        let elevation = self
            .source
            .elevation(resolution)
            .map_err(|source| EnergyBalanceError::ResourceLoad {
                resolution,
                dataset: Dataset::Elevation,
                source,
            })?;
        let forest_density = self.source.forest_density(resolution).map_err(|source| {
            EnergyBalanceError::ResourceLoad {
                resolution,
                dataset: Dataset::ForestDensity,
                source,
            }
        })?;
        StaticGrids::from_rasters(resolution, &elevation, &forest_density)
    }
}
