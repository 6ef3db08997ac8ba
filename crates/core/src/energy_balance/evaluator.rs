//! Grid evaluation of the snow surface energy balance
//!
//! [`EnergyBalance::evaluate`] runs the whole flux chain for one time step:
//!
//! 1. relative humidity, saturation and actual vapor pressures, air density
//! 2. wind function and bulk exchange coefficient
//! 3. Richardson-number stability correction
//! 4. atmospheric and canopy-weighted emissivity
//! 5. latent heat, sensible heat, canopy-corrected and upwelling longwave
//!
//! Every intermediate grid is kept in [`Diagnostics`] for inspection.

use crate::core_types::{Grid, Resolution, Shape};
use crate::energy_balance::{CellForcing, MeteorologicalForcing};
use crate::error::Result;
use crate::grid::{RasterSource, StaticDatasets, StaticGrids};
use crate::physics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Surface energy fluxes for a single cell (W/m²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellFluxes {
    /// Latent heat flux LH
    pub latent_heat: f64,
    /// Sensible heat flux SH
    pub sensible_heat: f64,
    /// Canopy-corrected downwelling longwave CDLW
    pub canopy_downwelling_longwave: f64,
    /// Upwelling longwave ULW
    pub upwelling_longwave: f64,
}

/// The four output grids (W/m²)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxGrids {
    /// Latent heat flux LH
    pub latent_heat: Grid,
    /// Sensible heat flux SH
    pub sensible_heat: Grid,
    /// Canopy-corrected downwelling longwave CDLW
    pub canopy_downwelling_longwave: Grid,
    /// Upwelling longwave ULW
    pub upwelling_longwave: Grid,
}

impl FluxGrids {
    /// Fluxes at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> CellFluxes {
        CellFluxes {
            latent_heat: self.latent_heat.get(row, col),
            sensible_heat: self.sensible_heat.get(row, col),
            canopy_downwelling_longwave: self.canopy_downwelling_longwave.get(row, col),
            upwelling_longwave: self.upwelling_longwave.get(row, col),
        }
    }

    /// Total number of NaN or infinite cells across the four grids
    #[must_use]
    pub fn count_non_finite(&self) -> usize {
        self.latent_heat.count_non_finite()
            + self.sensible_heat.count_non_finite()
            + self.canopy_downwelling_longwave.count_non_finite()
            + self.upwelling_longwave.count_non_finite()
    }
}

/// Intermediate grids of the flux chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Relative humidity (%), unclamped
    pub relative_humidity: Grid,
    /// Saturation vapor pressure of the air (Pa)
    pub e_sat_air: Grid,
    /// Saturation vapor pressure at the snow surface (Pa)
    pub e_sat_snow: Grid,
    /// Actual vapor pressure of the air (Pa)
    pub e_a: Grid,
    /// Dry air density (g/cm³)
    pub rho_a: Grid,
    /// Wind-function scale b
    pub b: Grid,
    /// Wind function f(u)
    pub fu: Grid,
    /// Bulk exchange coefficient D_h,e
    pub d_h_e: Grid,
    /// Bulk Richardson number
    pub richardson: Grid,
    /// Unstable-branch coefficient γ
    pub gamma: Grid,
    /// Stability correction ζ
    pub zeta: Grid,
    /// Atmospheric emissivity
    pub atm_emissivity: Grid,
    /// Canopy-weighted emissivity
    pub weighted_emissivity: Grid,
}

/// Result of one evaluation: outputs plus every intermediate grid
///
/// Constructed only by [`EnergyBalance::evaluate`]; a failed evaluation leaves nothing
/// behind.
#[derive(Debug, Clone)]
pub struct EnergyBalance {
    resolution: Resolution,
    statics: Arc<StaticGrids>,
    diagnostics: Diagnostics,
    fluxes: FluxGrids,
}

impl EnergyBalance {
    /// Evaluate the flux chain for `forcing` at `resolution`
    ///
    /// # Arguments
    ///
    /// * `forcing` - Six meteorological grids of identical shape
    /// * `datasets` - Shared static datasets; the grids for `resolution` are loaded on
    ///   first use
    /// * `resolution` - Which static grids to use
    ///
    /// # Errors
    ///
    /// - [`EnergyBalanceError::ShapeMismatch`](crate::EnergyBalanceError::ShapeMismatch)
    ///   if any input or static grid differs in shape
    /// - [`EnergyBalanceError::ResourceLoad`](crate::EnergyBalanceError::ResourceLoad)
    ///   if the static rasters cannot be loaded
    pub fn evaluate<S: RasterSource>(
        forcing: &MeteorologicalForcing,
        datasets: &StaticDatasets<S>,
        resolution: Resolution,
    ) -> Result<Self> {
        let shape = forcing.validate()?;
        let statics = datasets.grids(resolution)?;
        statics.forest_fraction.ensure_shape("forest_fraction", shape)?;
        statics.standard_pressure.ensure_shape("standard_pressure", shape)?;

        debug!(
            "Evaluating energy balance: {}x{} grid at {}",
            shape.0, shape.1, resolution
        );

        let (diagnostics, fluxes) = run_chain(shape, forcing, &statics);

        let non_finite = fluxes.count_non_finite();
        if non_finite > 0 {
            warn!(
                "Energy balance at {} produced {} non-finite output cells",
                resolution, non_finite
            );
        }

        Ok(Self {
            resolution,
            statics,
            diagnostics,
            fluxes,
        })
    }

    /// Same as [`EnergyBalance::evaluate`] with the resolution given in meters
    ///
    /// # Errors
    ///
    /// Additionally returns
    /// [`UnsupportedResolution`](crate::EnergyBalanceError::UnsupportedResolution) for
    /// values other than 500 and 30.
    pub fn evaluate_at<S: RasterSource>(
        forcing: &MeteorologicalForcing,
        datasets: &StaticDatasets<S>,
        resolution_meters: u32,
    ) -> Result<Self> {
        let resolution = Resolution::try_from(resolution_meters)?;
        Self::evaluate(forcing, datasets, resolution)
    }

    /// Resolution used for this evaluation
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Grid shape
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.fluxes.latent_heat.shape()
    }

    /// Static grids the evaluation ran against
    #[must_use]
    pub fn static_grids(&self) -> &StaticGrids {
        &self.statics
    }

    /// Output flux grids
    #[must_use]
    pub fn fluxes(&self) -> &FluxGrids {
        &self.fluxes
    }

    /// Intermediate grids
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the evaluation, keeping only the outputs
    #[must_use]
    pub fn into_fluxes(self) -> FluxGrids {
        self.fluxes
    }

    /// Net longwave at the snow surface, CDLW - ULW (W/m²)
    #[must_use]
    pub fn net_longwave(&self) -> Grid {
        let (rows, cols) = self.shape();
        let down = self.fluxes.canopy_downwelling_longwave.as_slice();
        let up = self.fluxes.upwelling_longwave.as_slice();
        Grid::from_fn(rows, cols, |i| down[i] - up[i])
    }
}

/// Every quantity of the flux chain at one cell
#[derive(Debug, Clone, Copy)]
struct CellChain {
    relative_humidity: f64,
    e_sat_air: f64,
    e_sat_snow: f64,
    e_a: f64,
    rho_a: f64,
    b: f64,
    fu: f64,
    d_h_e: f64,
    richardson: f64,
    gamma: f64,
    zeta: f64,
    atm_emissivity: f64,
    weighted_emissivity: f64,
    fluxes: CellFluxes,
}

impl CellChain {
    fn compute(cell: &CellForcing, forest_fraction: f64, standard_pressure: f64) -> Self {
        // Moisture and density
        let relative_humidity = physics::relative_humidity(cell.air_tmp, cell.pres, cell.spfh);
        let e_sat_air = physics::saturation_vapor_pressure(cell.air_tmp);
        let e_sat_snow = physics::saturation_vapor_pressure(cell.snow_tmp);
        let e_a = physics::actual_vapor_pressure(relative_humidity, e_sat_air);
        let rho_a = physics::dry_air_density(cell.pres, cell.air_tmp);

        // Turbulent transfer
        let b = physics::wind_function_scale(rho_a, standard_pressure);
        let fu = physics::wind_function(b, cell.wind);
        let d_h_e = physics::exchange_coefficient(cell.wind);
        let gamma = physics::unstable_gamma(d_h_e, cell.wind);
        let richardson = physics::richardson_number(cell.air_tmp, cell.wind);
        let zeta = physics::stability_correction(richardson, gamma);

        // Radiation
        let atm_emissivity = physics::atmospheric_emissivity(cell.dlw, cell.air_tmp);
        let weighted_emissivity = physics::weighted_emissivity(atm_emissivity, forest_fraction);

        let fluxes = CellFluxes {
            latent_heat: physics::latent_heat(zeta, fu, e_a, e_sat_snow),
            sensible_heat: physics::sensible_heat(
                zeta,
                standard_pressure,
                fu,
                cell.air_tmp,
                cell.snow_tmp,
            ),
            canopy_downwelling_longwave: physics::canopy_downwelling_longwave(
                cell.dlw,
                weighted_emissivity,
                atm_emissivity,
            ),
            upwelling_longwave: physics::upwelling_longwave(cell.snow_tmp),
        };

        Self {
            relative_humidity,
            e_sat_air,
            e_sat_snow,
            e_a,
            rho_a,
            b,
            fu,
            d_h_e,
            richardson,
            gamma,
            zeta,
            atm_emissivity,
            weighted_emissivity,
            fluxes,
        }
    }
}

/// Element-wise pipeline over pre-validated grids
fn run_chain(
    (rows, cols): Shape,
    forcing: &MeteorologicalForcing,
    statics: &StaticGrids,
) -> (Diagnostics, FluxGrids) {
    let air_tmp = forcing.air_tmp.as_slice();
    let snow_tmp = forcing.snow_tmp.as_slice();
    let pres = forcing.pres.as_slice();
    let spfh = forcing.spfh.as_slice();
    let wind = forcing.wind.as_slice();
    let dlw = forcing.dlw.as_slice();
    let forest_fraction = statics.forest_fraction.as_slice();
    let p_a = statics.standard_pressure.as_slice();

    let cells: Vec<CellChain> = (0..rows * cols)
        .map(|i| {
            let cell = CellForcing {
                air_tmp: air_tmp[i],
                snow_tmp: snow_tmp[i],
                pres: pres[i],
                spfh: spfh[i],
                wind: wind[i],
                dlw: dlw[i],
            };
            CellChain::compute(&cell, forest_fraction[i], p_a[i])
        })
        .collect();
    let field = |f: fn(&CellChain) -> f64| Grid::from_fn(rows, cols, |i| f(&cells[i]));

    let fluxes = FluxGrids {
        latent_heat: field(|c| c.fluxes.latent_heat),
        sensible_heat: field(|c| c.fluxes.sensible_heat),
        canopy_downwelling_longwave: field(|c| c.fluxes.canopy_downwelling_longwave),
        upwelling_longwave: field(|c| c.fluxes.upwelling_longwave),
    };
    let diagnostics = Diagnostics {
        relative_humidity: field(|c| c.relative_humidity),
        e_sat_air: field(|c| c.e_sat_air),
        e_sat_snow: field(|c| c.e_sat_snow),
        e_a: field(|c| c.e_a),
        rho_a: field(|c| c.rho_a),
        b: field(|c| c.b),
        fu: field(|c| c.fu),
        d_h_e: field(|c| c.d_h_e),
        richardson: field(|c| c.richardson),
        gamma: field(|c| c.gamma),
        zeta: field(|c| c.zeta),
        atm_emissivity: field(|c| c.atm_emissivity),
        weighted_emissivity: field(|c| c.weighted_emissivity),
    };
    (diagnostics, fluxes)
}

/// Evaluate the flux chain for a single cell
///
/// Scalar counterpart of [`EnergyBalance::evaluate`]; a uniform grid evaluation yields
/// exactly this value in every cell.
///
/// # Arguments
/// * `cell` - Meteorological values
/// * `forest_fraction` - Canopy fraction F_c (0-1)
/// * `standard_pressure` - Standard atmosphere pressure P_A (mb)
#[must_use]
pub fn evaluate_cell(
    cell: &CellForcing,
    forest_fraction: f64,
    standard_pressure: f64,
) -> CellFluxes {
    CellChain::compute(cell, forest_fraction, standard_pressure).fluxes
}

/// Relative humidity over whole grids, independent of a full evaluation
///
/// Produces the same values as [`Diagnostics::relative_humidity`].
///
/// # Errors
///
/// Returns [`EnergyBalanceError::ShapeMismatch`](crate::EnergyBalanceError::ShapeMismatch)
/// if the three grids differ in shape.
pub fn relative_humidity_grid(air_tmp: &Grid, pres: &Grid, spfh: &Grid) -> Result<Grid> {
    let shape = air_tmp.shape();
    pres.ensure_shape("pres", shape)?;
    spfh.ensure_shape("spfh", shape)?;
    let (t, p, q) = (air_tmp.as_slice(), pres.as_slice(), spfh.as_slice());
    Ok(Grid::from_fn(shape.0, shape.1, |i| {
        physics::relative_humidity(t[i], p[i], q[i])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::InMemoryRasterSource;
    use crate::EnergyBalanceError;

    const COLD_CLEAR: CellForcing = CellForcing {
        air_tmp: -6.0,
        snow_tmp: -9.0,
        pres: 78_000.0,
        spfh: 0.0015,
        wind: 4.0,
        dlw: 190.0,
    };

    fn datasets(rows: usize, cols: usize) -> StaticDatasets<InMemoryRasterSource> {
        StaticDatasets::new(
            InMemoryRasterSource::new()
                .with_resolution(
                    Resolution::M500,
                    Grid::filled(rows, cols, 20.0),
                    Grid::filled(rows, cols, 30.0),
                )
                .with_resolution(
                    Resolution::M30,
                    Grid::filled(rows, cols, 25.0),
                    Grid::filled(rows, cols, 0.0),
                ),
        )
    }

    #[test]
    fn test_uniform_grid_matches_scalar_chain() {
        let forcing = MeteorologicalForcing::uniform(4, 3, &COLD_CLEAR);
        let datasets = datasets(4, 3);
        let balance = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500).unwrap();

        let statics = balance.static_grids();
        let expected = evaluate_cell(
            &COLD_CLEAR,
            statics.forest_fraction.get(0, 0),
            statics.standard_pressure.get(0, 0),
        );
        for row in 0..4 {
            for col in 0..3 {
                assert_eq!(balance.fluxes().cell(row, col), expected);
            }
        }
    }

    #[test]
    fn test_grid_diagnostics_come_from_the_cell_chain() {
        let forcing = MeteorologicalForcing {
            air_tmp: Grid::from_vec(1, 3, vec![-12.0, -1.0, 2.5]).unwrap(),
            wind: Grid::from_vec(1, 3, vec![0.7, 4.0, 9.0]).unwrap(),
            ..MeteorologicalForcing::uniform(1, 3, &COLD_CLEAR)
        };
        let balance = EnergyBalance::evaluate(&forcing, &datasets(1, 3), Resolution::M500).unwrap();
        let (d, statics) = (balance.diagnostics(), balance.static_grids());

        for col in 0..3 {
            let chain = CellChain::compute(
                &forcing.cell(0, col),
                statics.forest_fraction.get(0, col),
                statics.standard_pressure.get(0, col),
            );
            assert_eq!(balance.fluxes().cell(0, col), chain.fluxes);
            assert_eq!(d.relative_humidity.get(0, col), chain.relative_humidity);
            assert_eq!(d.e_a.get(0, col), chain.e_a);
            assert_eq!(d.fu.get(0, col), chain.fu);
            assert_eq!(d.richardson.get(0, col), chain.richardson);
            assert_eq!(d.zeta.get(0, col), chain.zeta);
            assert_eq!(d.weighted_emissivity.get(0, col), chain.weighted_emissivity);
        }
    }

    #[test]
    fn test_intermediates_are_retained() {
        let forcing = MeteorologicalForcing::uniform(2, 2, &COLD_CLEAR);
        let balance = EnergyBalance::evaluate(&forcing, &datasets(2, 2), Resolution::M500).unwrap();
        let d = balance.diagnostics();
        for grid in [
            &d.relative_humidity,
            &d.e_sat_air,
            &d.e_sat_snow,
            &d.e_a,
            &d.rho_a,
            &d.b,
            &d.fu,
            &d.d_h_e,
            &d.richardson,
            &d.gamma,
            &d.zeta,
            &d.atm_emissivity,
            &d.weighted_emissivity,
        ] {
            assert_eq!(grid.shape(), (2, 2));
        }
        // Cold air with a negative temperature still gives a positive Richardson number
        assert!(d.richardson.get(0, 0) > 0.0);
        assert!(d.zeta.get(0, 0) > 0.0 && d.zeta.get(0, 0) < 1.0);
    }

    #[test]
    fn test_standalone_relative_humidity_matches_internal() {
        let forcing = MeteorologicalForcing {
            air_tmp: Grid::from_vec(1, 3, vec![-12.0, 0.5, 3.0]).unwrap(),
            ..MeteorologicalForcing::uniform(1, 3, &COLD_CLEAR)
        };
        let balance = EnergyBalance::evaluate(&forcing, &datasets(1, 3), Resolution::M30).unwrap();
        let standalone =
            relative_humidity_grid(&forcing.air_tmp, &forcing.pres, &forcing.spfh).unwrap();
        assert_eq!(standalone, balance.diagnostics().relative_humidity);
    }

    #[test]
    fn test_relative_humidity_grid_shape_check() {
        let err = relative_humidity_grid(
            &Grid::zeros(2, 2),
            &Grid::zeros(2, 2),
            &Grid::zeros(2, 1),
        )
        .unwrap_err();
        assert!(matches!(err, EnergyBalanceError::ShapeMismatch { field: "spfh", .. }));
    }

    #[test]
    fn test_static_grid_shape_must_match_forcing() {
        let forcing = MeteorologicalForcing::uniform(3, 3, &COLD_CLEAR);
        let err = EnergyBalance::evaluate(&forcing, &datasets(2, 2), Resolution::M500).unwrap_err();
        assert!(matches!(
            err,
            EnergyBalanceError::ShapeMismatch {
                field: "forest_fraction",
                expected: (3, 3),
                actual: (2, 2)
            }
        ));
    }

    #[test]
    fn test_unsupported_resolution_rejected() {
        let forcing = MeteorologicalForcing::uniform(1, 1, &COLD_CLEAR);
        let err = EnergyBalance::evaluate_at(&forcing, &datasets(1, 1), 250).unwrap_err();
        assert!(matches!(err, EnergyBalanceError::UnsupportedResolution(250)));
    }

    #[test]
    fn test_net_longwave() {
        let forcing = MeteorologicalForcing::uniform(1, 2, &COLD_CLEAR);
        let balance = EnergyBalance::evaluate(&forcing, &datasets(1, 2), Resolution::M30).unwrap();
        let net = balance.net_longwave();
        let fluxes = balance.fluxes();
        assert_eq!(
            net.get(0, 1),
            fluxes.canopy_downwelling_longwave.get(0, 1) - fluxes.upwelling_longwave.get(0, 1)
        );
        // Open cell at 30 m: CDLW is the observed DLW
        assert_eq!(fluxes.canopy_downwelling_longwave.get(0, 0), COLD_CLEAR.dlw);
    }

    #[test]
    fn test_into_fluxes_keeps_outputs() {
        let forcing = MeteorologicalForcing::uniform(1, 1, &COLD_CLEAR);
        let balance = EnergyBalance::evaluate(&forcing, &datasets(1, 1), Resolution::M500).unwrap();
        let expected = balance.fluxes().clone();
        assert_eq!(balance.resolution(), Resolution::M500);
        assert_eq!(balance.shape(), (1, 1));
        assert_eq!(balance.into_fluxes(), expected);
    }
}
