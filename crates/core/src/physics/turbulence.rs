//! Bulk aerodynamic transfer and stability correction
//!
//! Implements the Snow-17 wind function and the Liston et al. (1999) bulk exchange
//! coefficient with a Richardson-number stability correction.
//!
//! # References
//! - Anderson, E.A. (1976). NOAA Technical Report NWS 19, wind function f(u)
//! - Liston, G.E. et al. (1999). Journal of Applied Meteorology, 38(10), 1474-1487
//! - Louis, J.F. (1979). "A parametric model of vertical eddy fluxes in the atmosphere"
//!   Boundary-Layer Meteorology, 17, 187-202

use super::constants::{
    neutral_transfer_factor, EPSILON, K, RHO_W, WIND_FUNCTION_SCALE, Z_0, Z_A,
};

/// Stable-branch coefficient in `1 / (1 + 4.7·Ri)²`
const STABLE_COEFF: f64 = 4.7;

/// Unstable-branch coefficient in `1 - 9.4·Ri / (1 + γ·|Ri|^½)`
const UNSTABLE_COEFF: f64 = 9.4;

/// Louis (1979) constant entering γ
const LOUIS_C: f64 = 5.3;

/// Converts m/s wind into the cm-based Richardson expression
const WIND_TO_RICHARDSON: f64 = 27.78;

/// Wind-function scale `b`
///
/// b = (0.622·ρ_a) / (P_A·ρ_w) × 10⁶ × K² / ln(z_a/z_0)²
///
/// # Arguments
/// * `rho_a` - Dry air density (g/cm³)
/// * `standard_pressure` - Standard atmosphere pressure at the cell elevation (mb)
#[inline]
#[must_use]
pub fn wind_function_scale(rho_a: f64, standard_pressure: f64) -> f64 {
    (EPSILON * rho_a) / (standard_pressure * RHO_W) * 1.0e6 * neutral_transfer_factor()
}

/// Wind function `f(u) = b × u × 3.6`
///
/// # Arguments
/// * `b` - Wind-function scale from [`wind_function_scale`]
/// * `wind` - Wind speed (m/s)
#[inline]
#[must_use]
pub fn wind_function(b: f64, wind: f64) -> f64 {
    b * wind * WIND_FUNCTION_SCALE
}

/// Neutral bulk exchange coefficient D_h,e = K² × u / ln(z_a/z_0)²
///
/// # Arguments
/// * `wind` - Wind speed (m/s)
#[inline]
#[must_use]
pub fn exchange_coefficient(wind: f64) -> f64 {
    K.powi(2) * wind / (Z_A / Z_0).ln().powi(2)
}

/// Bulk Richardson number
///
/// Ri = 2 × 10 × z_a/100 × T / (T × (27.78·u)²)
///
/// The temperature term appears in both numerator and denominator, so `air_tmp == 0`
/// yields NaN, which [`stability_correction`] treats as neither stable nor unstable.
///
/// # Arguments
/// * `air_tmp` - Air temperature (°C)
/// * `wind` - Wind speed (m/s)
#[inline]
#[must_use]
pub fn richardson_number(air_tmp: f64, wind: f64) -> f64 {
    2.0 * 10.0 * Z_A / 100.0 * air_tmp / (air_tmp * (WIND_TO_RICHARDSON * wind).powi(2))
}

/// Louis (1979) γ coefficient used by the unstable branch
///
/// γ = 5.3 × 9.4 × D_h,e / u × (z_a/z_0)^½
#[inline]
#[must_use]
pub fn unstable_gamma(d_h_e: f64, wind: f64) -> f64 {
    LOUIS_C * UNSTABLE_COEFF * d_h_e / wind * (Z_A / Z_0).sqrt()
}

/// Stability correction ζ applied to the turbulent fluxes
///
/// - Ri > 0 (stable): ζ = 1 / (1 + 4.7·Ri)²
/// - Ri < 0 (unstable): ζ = 1 - 9.4·Ri / (1 + γ·|Ri|^½)
/// - otherwise (Ri == 0 or NaN): ζ = 0
///
/// The last case switches the turbulent fluxes off entirely. It is kept as is.
#[inline]
#[must_use]
pub fn stability_correction(r_i: f64, gamma: f64) -> f64 {
    if r_i > 0.0 {
        1.0 / (1.0 + STABLE_COEFF * r_i).powi(2)
    } else if r_i < 0.0 {
        1.0 - (UNSTABLE_COEFF * r_i / (1.0 + gamma * r_i.abs().sqrt()))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exchange_coefficient_linear_in_wind() {
        let one = exchange_coefficient(1.0);
        assert_relative_eq!(exchange_coefficient(3.0), 3.0 * one, max_relative = 1e-14);
        assert_relative_eq!(one, neutral_transfer_factor(), max_relative = 1e-14);
    }

    #[test]
    fn test_wind_function() {
        assert_relative_eq!(wind_function(2.0, 5.0), 36.0);
    }

    #[test]
    fn test_richardson_sign_follows_wind_only() {
        // T cancels, leaving 200 / (27.78 u)² for any non-zero T
        let expected = 200.0 / (27.78_f64 * 2.0).powi(2);
        assert_relative_eq!(richardson_number(5.0, 2.0), expected, max_relative = 1e-12);
        assert_relative_eq!(richardson_number(-5.0, 2.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_richardson_nan_at_zero_temperature() {
        assert!(richardson_number(0.0, 2.0).is_nan());
    }

    #[test]
    fn test_stable_branch() {
        let r_i = 0.25;
        assert_relative_eq!(
            stability_correction(r_i, 123.0),
            1.0 / (1.0 + 4.7 * r_i).powi(2)
        );
    }

    #[test]
    fn test_unstable_branch() {
        let r_i = -0.04;
        let gamma = 10.0;
        let expected = 1.0 - (9.4 * r_i / (1.0 + gamma * 0.2));
        assert_relative_eq!(stability_correction(r_i, gamma), expected, max_relative = 1e-14);
        assert!(stability_correction(r_i, gamma) > 1.0);
    }

    #[test]
    fn test_neutral_and_nan_give_zero() {
        assert_eq!(stability_correction(0.0, 1.0), 0.0);
        assert_eq!(stability_correction(f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_gamma_uses_exchange_over_wind() {
        let wind = 4.0;
        let gamma = unstable_gamma(exchange_coefficient(wind), wind);
        // D_h,e / u is wind independent
        assert_relative_eq!(
            gamma,
            5.3 * 9.4 * neutral_transfer_factor() * (1.0e5_f64).sqrt(),
            max_relative = 1e-12
        );
    }
}
