//! Longwave radiation at the snow surface
//!
//! Atmospheric emissivity is backed out of the observed downwelling longwave, blended
//! with the canopy emissivity by forest fraction, and used to correct the incoming
//! longwave for the sky view lost under the canopy.
//!
//! # References
//! - Stefan (1879), Boltzmann (1884): Radiation law
//! - Liston, G.E., Elder, K. (2006). "A meteorological distribution system for
//!   high-resolution terrestrial modeling (MicroMet)" Journal of Hydrometeorology, 7, 217-234

use super::constants::{KELVIN_OFFSET, SNOW_EMISSIVITY, STEFAN_BOLTZMANN};

/// Blackbody emission `σ × (T + 273.16)⁴` in W/m²
#[inline]
fn blackbody(temperature: f64) -> f64 {
    (temperature + KELVIN_OFFSET).powi(4) * STEFAN_BOLTZMANN
}

/// Effective atmospheric emissivity ε_a = L↓ / (σ·T_a⁴)
///
/// # Arguments
/// * `dlw` - Downwelling longwave radiation (W/m²)
/// * `air_tmp` - Air temperature (°C)
#[inline]
#[must_use]
pub fn atmospheric_emissivity(dlw: f64, air_tmp: f64) -> f64 {
    dlw / blackbody(air_tmp)
}

/// Canopy-weighted emissivity ε = (1 - F_c)·ε_a + F_c·0.98
///
/// # Arguments
/// * `atm_emissivity` - Atmospheric emissivity
/// * `forest_fraction` - Canopy coverage fraction (0-1)
#[inline]
#[must_use]
pub fn weighted_emissivity(atm_emissivity: f64, forest_fraction: f64) -> f64 {
    ((1.0 - forest_fraction) * atm_emissivity) + forest_fraction * SNOW_EMISSIVITY
}

/// Canopy-corrected downwelling longwave L↓ × ε / ε_a
///
/// The emissivity ratio is formed first so that an open cell (ε == ε_a) returns the
/// observed `dlw` bit for bit.
#[inline]
#[must_use]
pub fn canopy_downwelling_longwave(dlw: f64, weighted_emissivity: f64, atm_emissivity: f64) -> f64 {
    dlw * (weighted_emissivity / atm_emissivity)
}

/// Longwave emitted by the snow surface 0.98 × σ × T_s⁴
///
/// # Arguments
/// * `snow_tmp` - Snow surface temperature (°C)
#[inline]
#[must_use]
pub fn upwelling_longwave(snow_tmp: f64) -> f64 {
    SNOW_EMISSIVITY * STEFAN_BOLTZMANN * (snow_tmp + KELVIN_OFFSET).powi(4)
}
