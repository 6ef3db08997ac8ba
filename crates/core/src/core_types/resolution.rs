//! Spatial resolution selector for the static datasets
//!
//! The model runs on one of two fixed grid spacings. The resolution picks which
//! forest-density and elevation rasters back the evaluation.

use crate::error::{EnergyBalanceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported grid spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Resolution {
    /// 500 m cells (regional runs)
    M500,
    /// 30 m cells (Landsat-scale runs)
    M30,
}

impl Resolution {
    /// All supported resolutions
    pub const ALL: [Self; 2] = [Self::M500, Self::M30];

    /// Grid spacing in meters
    #[must_use]
    pub const fn meters(self) -> u32 {
        match self {
            Self::M500 => 500,
            Self::M30 => 30,
        }
    }

    /// Parse a resolution given in meters
    ///
    /// # Errors
    ///
    /// Returns [`EnergyBalanceError::UnsupportedResolution`] for anything other than 500 or 30.
    pub fn from_meters(meters: u32) -> Result<Self> {
        match meters {
            500 => Ok(Self::M500),
            30 => Ok(Self::M30),
            other => Err(EnergyBalanceError::UnsupportedResolution(other)),
        }
    }

    /// Slot used by resolution-indexed caches
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::M500 => 0,
            Self::M30 => 1,
        }
    }
}

impl TryFrom<u32> for Resolution {
    type Error = EnergyBalanceError;

    fn try_from(meters: u32) -> Result<Self> {
        Self::from_meters(meters)
    }
}

impl From<Resolution> for u32 {
    fn from(resolution: Resolution) -> Self {
        resolution.meters()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.meters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_values() {
        assert_eq!(Resolution::try_from(500).unwrap(), Resolution::M500);
        assert_eq!(Resolution::try_from(30).unwrap(), Resolution::M30);
        assert_eq!(Resolution::M500.meters(), 500);
        assert_eq!(Resolution::M30.meters(), 30);
    }

    #[test]
    fn test_unsupported_value_is_config_error() {
        for bad in [0, 29, 31, 250, 501, 1000] {
            let err = Resolution::try_from(bad).unwrap_err();
            assert!(matches!(err, EnergyBalanceError::UnsupportedResolution(v) if v == bad));
        }
    }

    #[test]
    fn test_cache_slots_are_distinct() {
        assert_ne!(Resolution::M500.index(), Resolution::M30.index());
        for res in Resolution::ALL {
            assert!(res.index() < Resolution::ALL.len());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Resolution::M500.to_string(), "500 m");
        assert_eq!(Resolution::M30.to_string(), "30 m");
    }
}
