//! Error type for energy-balance evaluation

use crate::core_types::{Resolution, Shape};
use thiserror::Error;

/// Boxed error produced by a [`RasterSource`](crate::grid::RasterSource) implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EnergyBalanceError>;

/// Static dataset kinds requested from a raster source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Digital elevation model used for the standard atmosphere
    Elevation,
    /// Forest canopy density in percent
    ForestDensity,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Elevation => write!(f, "elevation"),
            Self::ForestDensity => write!(f, "forest density"),
        }
    }
}

/// Errors raised while preparing or evaluating the flux chain
///
/// Numeric edge cases (division by zero, logarithms of non-positive values) are not
/// errors: they propagate through the grids as NaN or infinity.
#[derive(Debug, Error)]
pub enum EnergyBalanceError {
    /// Two grids taking part in one evaluation have different dimensions
    #[error("Shape mismatch for {field}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Name of the offending grid
        field: &'static str,
        /// Shape shared by the reference grid
        expected: Shape,
        /// Shape of the offending grid
        actual: Shape,
    },

    /// Resolution value is not one of the supported grid spacings
    #[error("Unsupported resolution: {0} m (expected 500 or 30)")]
    UnsupportedResolution(u32),

    /// Raster collaborator could not provide a static dataset
    #[error("Failed to load {dataset} raster at {resolution}: {source}")]
    ResourceLoad {
        /// Resolution that was requested
        resolution: Resolution,
        /// Dataset that was requested
        dataset: Dataset,
        /// Error reported by the raster source
        #[source]
        source: BoxError,
    },

    /// Grid buffer length does not match its declared dimensions
    #[error("Grid data size mismatch: expected {expected} elements, got {actual}")]
    InvalidGridData {
        /// `rows * cols`
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },
}
