//! Resolution selection and static dataset loading
//!
//! The 500 m resolution must evaluate against the 500 m rasters and the 30 m
//! resolution against the 30 m rasters. Static rasters are loaded lazily, once per
//! resolution, and shared read-only across evaluations.

use approx::assert_relative_eq;
use ctor::ctor;
use snowflux_core::{
    BoxError, CellForcing, Dataset, EnergyBalance, EnergyBalanceError, Grid,
    InMemoryRasterSource, MeteorologicalForcing, RasterSource, Resolution, StaticDatasets,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const WARM_AIR: CellForcing = CellForcing {
    air_tmp: 2.0,
    snow_tmp: 0.0,
    pres: 87_000.0,
    spfh: 0.003,
    wind: 2.0,
    dlw: 250.0,
};

/// Raster source tagging each resolution with a distinct elevation
///
/// 500 m rasters sit at 1500 m, 30 m rasters at 2500 m, so the binding is observable
/// through the standard atmosphere pressure.
struct TaggedSource {
    elevation_reads: [AtomicUsize; 2],
}

impl TaggedSource {
    fn new() -> Self {
        Self {
            elevation_reads: [AtomicUsize::new(0), AtomicUsize::new(0)],
        }
    }

    fn reads(&self, resolution: Resolution) -> usize {
        let slot = match resolution {
            Resolution::M500 => 0,
            Resolution::M30 => 1,
        };
        self.elevation_reads[slot].load(Ordering::SeqCst)
    }
}

impl RasterSource for TaggedSource {
    fn elevation(&self, resolution: Resolution) -> Result<Grid, BoxError> {
        let (slot, hundreds_of_meters) = match resolution {
            Resolution::M500 => (0, 15.0),
            Resolution::M30 => (1, 25.0),
        };
        self.elevation_reads[slot].fetch_add(1, Ordering::SeqCst);
        Ok(Grid::filled(2, 2, hundreds_of_meters))
    }

    fn forest_density(&self, _resolution: Resolution) -> Result<Grid, BoxError> {
        Ok(Grid::filled(2, 2, 0.0))
    }
}

#[test]
fn test_500m_binds_to_500m_rasters() {
    let datasets = StaticDatasets::new(TaggedSource::new());
    let forcing = MeteorologicalForcing::uniform(2, 2, &WARM_AIR);

    let at_500 = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500).unwrap();
    let at_30 = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M30).unwrap();

    assert_relative_eq!(
        at_500.static_grids().standard_pressure.get(0, 0),
        847.218907342255,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        at_30.static_grids().standard_pressure.get(0, 0),
        745.7084645958371,
        max_relative = 1e-12
    );
}

#[test]
fn test_resolution_switch_changes_turbulent_fluxes() {
    let datasets = StaticDatasets::new(TaggedSource::new());
    let forcing = MeteorologicalForcing::uniform(2, 2, &WARM_AIR);

    let at_500 = EnergyBalance::evaluate_at(&forcing, &datasets, 500).unwrap();
    let at_30 = EnergyBalance::evaluate_at(&forcing, &datasets, 30).unwrap();
    let (f500, f30) = (at_500.fluxes().cell(0, 0), at_30.fluxes().cell(0, 0));

    // Lower standard pressure strengthens the wind function and hence sublimation
    assert_relative_eq!(f500.latent_heat, -6.226688052752037, max_relative = 1e-10);
    assert_relative_eq!(f30.latent_heat, -7.074303295286885, max_relative = 1e-10);
    assert!(f30.latent_heat < f500.latent_heat);

    // P_A enters the sensible heat both directly and through f(u), and cancels
    assert_relative_eq!(f500.sensible_heat, 3.1375964183779965, max_relative = 1e-10);
    assert_relative_eq!(f30.sensible_heat, f500.sensible_heat, max_relative = 1e-12);

    // Radiation does not depend on the standard atmosphere
    assert_eq!(f500.upwelling_longwave, f30.upwelling_longwave);
    assert_eq!(f500.canopy_downwelling_longwave, f30.canopy_downwelling_longwave);
}

#[test]
fn test_static_grids_load_lazily_once_per_resolution() {
    let datasets = StaticDatasets::new(TaggedSource::new());
    let forcing = MeteorologicalForcing::uniform(2, 2, &WARM_AIR);

    assert_eq!(datasets.source().reads(Resolution::M500), 0);
    assert_eq!(datasets.source().reads(Resolution::M30), 0);

    for _ in 0..3 {
        EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500).unwrap();
    }
    assert_eq!(datasets.source().reads(Resolution::M500), 1);
    assert_eq!(datasets.source().reads(Resolution::M30), 0);
    assert!(!datasets.is_loaded(Resolution::M30));

    datasets.preload(Resolution::M30).unwrap();
    assert_eq!(datasets.source().reads(Resolution::M30), 1);
}

#[test]
fn test_static_grids_are_shared_between_evaluations() {
    let datasets = StaticDatasets::new(TaggedSource::new());
    let forcing = MeteorologicalForcing::uniform(2, 2, &WARM_AIR);

    let first = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500).unwrap();
    let second = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500).unwrap();
    let cached = datasets.grids(Resolution::M500).unwrap();

    assert!(std::ptr::eq(first.static_grids(), second.static_grids()));
    assert!(std::ptr::eq(first.static_grids(), Arc::as_ptr(&cached)));
}

#[test]
fn test_concurrent_readers_share_one_load() {
    let datasets = StaticDatasets::new(TaggedSource::new());
    datasets.preload(Resolution::M500).unwrap();

    std::thread::scope(|scope| {
        for step in 0..4 {
            let datasets = &datasets;
            scope.spawn(move || {
                let forcing = MeteorologicalForcing::uniform(
                    2,
                    2,
                    &CellForcing {
                        air_tmp: -1.0 - f64::from(step),
                        ..WARM_AIR
                    },
                );
                EnergyBalance::evaluate(&forcing, datasets, Resolution::M500).unwrap();
            });
        }
    });

    assert_eq!(datasets.source().reads(Resolution::M500), 1);
}

#[test]
fn test_raster_failure_is_surfaced_unchanged() {
    // Only the 500 m rasters are available
    let datasets = StaticDatasets::new(InMemoryRasterSource::new().with_resolution(
        Resolution::M500,
        Grid::filled(2, 2, 15.0),
        Grid::filled(2, 2, 0.0),
    ));
    let forcing = MeteorologicalForcing::uniform(2, 2, &WARM_AIR);

    let err = EnergyBalance::evaluate(&forcing, &datasets, Resolution::M30).unwrap_err();
    match err {
        EnergyBalanceError::ResourceLoad {
            resolution,
            dataset,
            source,
        } => {
            assert_eq!(resolution, Resolution::M30);
            assert_eq!(dataset, Dataset::Elevation);
            assert_eq!(source.to_string(), "no rasters registered for 30 m");
        }
        other => panic!("expected ResourceLoad, got {other:?}"),
    }

    // The failure is not cached; 500 m is unaffected
    assert!(!datasets.is_loaded(Resolution::M30));
    assert!(EnergyBalance::evaluate(&forcing, &datasets, Resolution::M500).is_ok());
}

#[test]
fn test_resolution_configuration_round_trip() {
    let parsed: Resolution = serde_json::from_str("500").unwrap();
    assert_eq!(parsed, Resolution::M500);
    assert_eq!(serde_json::to_string(&Resolution::M30).unwrap(), "30");

    let rejected = serde_json::from_str::<Resolution>("250");
    assert!(rejected.is_err());
    assert!(matches!(
        Resolution::try_from(250),
        Err(EnergyBalanceError::UnsupportedResolution(250))
    ));
}
