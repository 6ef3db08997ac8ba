//! Turbulent heat fluxes between snow surface and atmosphere
//!
//! Both fluxes are computed in Snow-17 units and converted to W/m² with the
//! 11.62 factor. Positive values heat the snowpack.

use super::constants::{CP_AIR, EPSILON, L_S, LY_PER_6H_TO_WM2, PA_TO_MB, RHO_W};

/// Latent heat flux
///
/// Q_e = ζ × L_s × ρ_w/10 × f(u) × (e_a - e_s) × 0.01
///
/// # Arguments
/// * `zeta` - Stability correction
/// * `fu` - Wind function
/// * `e_a` - Actual vapor pressure of the air (Pa)
/// * `e_sat_snow` - Saturation vapor pressure at the snow surface (Pa)
///
/// # Returns
/// Latent heat flux (W/m²)
#[inline]
#[must_use]
pub fn latent_heat(zeta: f64, fu: f64, e_a: f64, e_sat_snow: f64) -> f64 {
    let q_e = zeta * L_S * RHO_W / 10.0 * fu * (e_a - e_sat_snow) * PA_TO_MB;
    q_e * LY_PER_6H_TO_WM2
}

/// Sensible heat flux
///
/// Q_h = ζ × ρ_w/10 × 0.24 × P_A/0.622 × f(u) × (T_a - T_s)
///
/// # Arguments
/// * `zeta` - Stability correction
/// * `standard_pressure` - Standard atmosphere pressure (mb)
/// * `fu` - Wind function
/// * `air_tmp` - Air temperature (°C)
/// * `snow_tmp` - Snow surface temperature (°C)
///
/// # Returns
/// Sensible heat flux (W/m²)
#[inline]
#[must_use]
pub fn sensible_heat(
    zeta: f64,
    standard_pressure: f64,
    fu: f64,
    air_tmp: f64,
    snow_tmp: f64,
) -> f64 {
    let q_h =
        zeta * RHO_W / 10.0 * CP_AIR * standard_pressure / EPSILON * fu * (air_tmp - snow_tmp);
    q_h * LY_PER_6H_TO_WM2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_gradient_no_flux() {
        assert_eq!(sensible_heat(0.8, 850.0, 2.0, -3.0, -3.0), 0.0);
        assert_eq!(latent_heat(0.8, 2.0, 400.0, 400.0), 0.0);
    }

    #[test]
    fn test_flux_sign_follows_gradient() {
        // Warm air over cold snow heats the pack
        assert!(sensible_heat(0.8, 850.0, 2.0, 2.0, -5.0) > 0.0);
        assert!(sensible_heat(0.8, 850.0, 2.0, -10.0, -5.0) < 0.0);
        // Dry air sublimates snow
        assert!(latent_heat(0.8, 2.0, 200.0, 400.0) < 0.0);
        assert!(latent_heat(0.8, 2.0, 500.0, 400.0) > 0.0);
    }

    #[test]
    fn test_zero_zeta_switches_fluxes_off() {
        assert_eq!(sensible_heat(0.0, 850.0, 2.0, 5.0, 0.0), 0.0);
        assert_eq!(latent_heat(0.0, 2.0, 800.0, 611.2), 0.0);
    }
}
