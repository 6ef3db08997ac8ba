//! Snow surface energy-balance evaluator
//!
//! Combines the scalar physics in [`crate::physics`] into an element-wise grid pipeline.

pub mod batch;
pub mod evaluator;
pub mod forcing;

pub use batch::evaluate_batch;
pub use evaluator::{
    evaluate_cell, relative_humidity_grid, CellFluxes, Diagnostics, EnergyBalance, FluxGrids,
};
pub use forcing::{CellForcing, MeteorologicalForcing};
