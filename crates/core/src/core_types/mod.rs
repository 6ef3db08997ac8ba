//! Core types and utilities

pub mod grid;
pub mod resolution;

pub use grid::{Grid, Shape};
pub use resolution::Resolution;
