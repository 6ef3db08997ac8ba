//! Parallel evaluation of independent time steps
//!
//! Evaluations share nothing but the read-only static datasets, so a series of forcings
//! can be evaluated concurrently without coordination.

use crate::core_types::Resolution;
use crate::energy_balance::{EnergyBalance, MeteorologicalForcing};
use crate::error::Result;
use crate::grid::{RasterSource, StaticDatasets};
use rayon::prelude::*;
use tracing::info;

/// Evaluate every forcing in `forcings` at `resolution`, in parallel
///
/// Results are returned in input order. A failing time step does not affect the others.
pub fn evaluate_batch<S: RasterSource>(
    forcings: &[MeteorologicalForcing],
    datasets: &StaticDatasets<S>,
    resolution: Resolution,
) -> Vec<Result<EnergyBalance>> {
    info!(
        "Evaluating {} time steps at {} using {} threads",
        forcings.len(),
        resolution,
        rayon::current_num_threads()
    );

    forcings
        .par_iter()
        .map(|forcing| EnergyBalance::evaluate(forcing, datasets, resolution))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Grid;
    use crate::energy_balance::CellForcing;
    use crate::grid::InMemoryRasterSource;
    use crate::EnergyBalanceError;

    fn step(air_tmp: f64) -> MeteorologicalForcing {
        MeteorologicalForcing::uniform(
            2,
            2,
            &CellForcing {
                air_tmp,
                snow_tmp: -1.0,
                pres: 80_000.0,
                spfh: 0.002,
                wind: 2.5,
                dlw: 220.0,
            },
        )
    }

    #[test]
    fn test_batch_matches_sequential() {
        let datasets = StaticDatasets::new(InMemoryRasterSource::new().with_resolution(
            Resolution::M500,
            Grid::filled(2, 2, 18.0),
            Grid::filled(2, 2, 50.0),
        ));
        let forcings: Vec<_> = (0..16).map(|i| step(-8.0 + f64::from(i))).collect();

        let parallel = evaluate_batch(&forcings, &datasets, Resolution::M500);
        assert_eq!(parallel.len(), forcings.len());

        for (forcing, result) in forcings.iter().zip(&parallel) {
            let sequential = EnergyBalance::evaluate(forcing, &datasets, Resolution::M500).unwrap();
            assert_eq!(result.as_ref().unwrap().fluxes(), sequential.fluxes());
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let datasets = StaticDatasets::new(InMemoryRasterSource::new().with_resolution(
            Resolution::M30,
            Grid::filled(2, 2, 18.0),
            Grid::filled(2, 2, 0.0),
        ));
        let mut bad = step(1.0);
        bad.pres = Grid::filled(3, 2, 80_000.0);
        let forcings = vec![step(-1.0), bad, step(2.0)];

        let results = evaluate_batch(&forcings, &datasets, Resolution::M30);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(EnergyBalanceError::ShapeMismatch { field: "pres", .. })
        ));
        assert!(results[2].is_ok());
    }
}
