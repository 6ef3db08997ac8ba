//! Moisture and density of the near-surface air
//!
//! Magnus-form saturation vapor pressure, relative humidity recovered from specific
//! humidity, and dry air density from the ideal gas law.
//!
//! # References
//! - Bolton, D. (1980). "The computation of equivalent potential temperature"
//!   Monthly Weather Review, 108(7), 1046-1053

use super::constants::{E_SAT_0, KELVIN_OFFSET, MAGNUS_A, MAGNUS_B, R_SPECIFIC};

/// Magnus exponent `17.67·T / (T + 243.5)`
#[inline]
fn magnus_exponent(temperature: f64) -> f64 {
    MAGNUS_A * temperature / (temperature + MAGNUS_B)
}

/// Relative humidity from specific humidity
///
/// RH = 0.263 × p × q / exp(17.67·T / (T + 243.5))
///
/// The result is not clamped: supersaturated or inconsistent inputs yield values
/// outside 0-100 and are passed on unchanged.
///
/// # Arguments
/// * `air_tmp` - Air temperature (°C)
/// * `pres` - Air pressure (Pa)
/// * `spfh` - Specific humidity (kg/kg)
///
/// # Returns
/// Relative humidity (%)
#[inline]
#[must_use]
pub fn relative_humidity(air_tmp: f64, pres: f64, spfh: f64) -> f64 {
    0.263 * pres * spfh * (1.0 / magnus_exponent(air_tmp).exp())
}

/// Saturation vapor pressure over a surface at `temperature`
///
/// e_sat = 611.2 × exp(17.67·T / (243.5 + T))
///
/// # Arguments
/// * `temperature` - Surface or air temperature (°C)
///
/// # Returns
/// Saturation vapor pressure (Pa)
#[inline]
#[must_use]
pub fn saturation_vapor_pressure(temperature: f64) -> f64 {
    E_SAT_0 * (MAGNUS_A * temperature / (MAGNUS_B + temperature)).exp()
}

/// Actual vapor pressure of the air, `(RH / 100) × e_sat_air`
///
/// # Arguments
/// * `rh` - Relative humidity (%)
/// * `e_sat_air` - Saturation vapor pressure of the air (Pa)
#[inline]
#[must_use]
pub fn actual_vapor_pressure(rh: f64, e_sat_air: f64) -> f64 {
    (rh / 100.0) * e_sat_air
}

/// Dry air density
///
/// ρ = p / (R_d × (T + 273.16)) / 1000, giving g/cm³
///
/// # Arguments
/// * `pres` - Air pressure (Pa)
/// * `air_tmp` - Air temperature (°C)
#[inline]
#[must_use]
pub fn dry_air_density(pres: f64, air_tmp: f64) -> f64 {
    pres / (R_SPECIFIC * (air_tmp + KELVIN_OFFSET)) / 1000.0
}
