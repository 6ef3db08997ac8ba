//! Scalar physics of the snow surface energy balance
//!
//! Each function evaluates one closed-form step of the flux chain for a single cell.
//! The grid evaluator in [`crate::energy_balance`] applies them element-wise.

pub mod constants;
pub mod fluxes;
pub mod humidity;
pub mod radiation;
pub mod turbulence;

pub use fluxes::{latent_heat, sensible_heat};
pub use humidity::{
    actual_vapor_pressure, dry_air_density, relative_humidity, saturation_vapor_pressure,
};
pub use radiation::{
    atmospheric_emissivity, canopy_downwelling_longwave, upwelling_longwave,
    weighted_emissivity,
};
pub use turbulence::{
    exchange_coefficient, richardson_number, stability_correction, unstable_gamma,
    wind_function, wind_function_scale,
};
