//! Physical constants and Snow-17 parameters
//!
//! Units follow the Snow-17 parameterization: heights in centimeters, latent heat in
//! cal/g and densities in g/cm³. Conversions to SI happen inside the flux formulas.
//!
//! # References
//! - Anderson, E.A. (1976). "A point energy and mass balance model of a snow cover"
//!   NOAA Technical Report NWS 19
//! - Liston, G.E. et al. (1999). "Local advection of momentum, heat, and moisture during
//!   the melt of patchy snow covers" Journal of Applied Meteorology, 38(10), 1474-1487

/// Reference height for wind and air measurements (cm)
pub const Z_A: f64 = 1000.0;

/// Surface roughness length of snow (cm)
pub const Z_0: f64 = 0.01;

/// Latent heat of sublimation (cal/g)
pub const L_S: f64 = 677.0;

/// Density of water (g/cm³)
pub const RHO_W: f64 = 1.0;

/// Specific gas constant for dry air (J/(kg·K))
pub const R_SPECIFIC: f64 = 287.058;

/// von Kármán constant (dimensionless)
pub const K: f64 = 0.40;

/// Pascal to millibar
pub const PA_TO_MB: f64 = 0.01;

/// Stefan-Boltzmann constant (W/(m²·K⁴))
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Emissivity of snow; also used for the forest canopy
pub const SNOW_EMISSIVITY: f64 = 0.98;

/// Celsius to Kelvin offset used throughout the model
pub const KELVIN_OFFSET: f64 = 273.16;

/// Ratio of molecular weights of water vapor and dry air
pub const EPSILON: f64 = 0.622;

/// Specific heat of air (cal/(g·K))
pub const CP_AIR: f64 = 0.24;

/// Converts Snow-17 energy units (ly per 6 h) to W/m²
pub const LY_PER_6H_TO_WM2: f64 = 11.62;

/// Converts the wind function from km/h to m/s based input
pub const WIND_FUNCTION_SCALE: f64 = 3.6;

/// Magnus coefficient for saturation vapor pressure over the range of interest
pub(crate) const MAGNUS_A: f64 = 17.67;

/// Magnus temperature offset (°C)
pub(crate) const MAGNUS_B: f64 = 243.5;

/// Saturation vapor pressure at 0°C (Pa)
pub(crate) const E_SAT_0: f64 = 611.2;

/// Squared von Kármán constant over the squared log-profile term, `K² / ln(Z_A/Z_0)²`
#[must_use]
pub fn neutral_transfer_factor() -> f64 {
    K.powi(2) / (Z_A / Z_0).ln().powi(2)
}
