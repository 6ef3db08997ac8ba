//! Two-dimensional grid storage shared by every stage of the flux chain
//!
//! A [`Grid`] stores one scalar field (temperature, pressure, a flux, ...) as a flat
//! `Vec<f64>` in row-major order. All grids taking part in one evaluation must share
//! the same `(rows, cols)` shape; see [`Grid::ensure_shape`].

use crate::error::{EnergyBalanceError, Result};
use serde::{Deserialize, Serialize};

/// Grid shape as `(rows, cols)`
pub type Shape = (usize, usize);

/// Scalar field over a regular 2-D grid
///
/// Values are stored in row-major order (`row * cols + col`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Cell values in row-major order
    data: Vec<f64>,
    /// Number of rows
    rows: usize,
    /// Number of columns
    cols: usize,
}

impl Grid {
    /// Create a new grid with given dimensions, initialized to zero
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows
    /// * `cols` - Number of columns
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Create a new grid with every cell set to `value`
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Wrap an existing row-major buffer
    ///
    /// # Errors
    ///
    /// Returns [`EnergyBalanceError::InvalidGridData`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EnergyBalanceError::InvalidGridData {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a grid by evaluating `f` on every flat (row-major) cell index
    ///
    /// This is the element-wise kernel used by the evaluator: callers that have already
    /// checked shapes can index several input slices with the same flat index.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, f: impl FnMut(usize) -> f64) -> Self {
        Self {
            data: (0..rows * cols).map(f).collect(),
            rows,
            cols,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid shape as `(rows, cols)`
    #[must_use]
    pub fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    /// Total number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major cell values
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major cell values
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the grid, returning its row-major buffer
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Get value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col]
    }

    /// Set value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col] = value;
    }

    /// Apply `f` to every cell, producing a new grid of the same shape
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Number of cells holding NaN or an infinity
    #[must_use]
    pub fn count_non_finite(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }

    /// Check that this grid has the `expected` shape
    ///
    /// `field` names the grid in the returned error.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyBalanceError::ShapeMismatch`] when the shapes differ.
    pub fn ensure_shape(&self, field: &'static str, expected: Shape) -> Result<()> {
        if self.shape() == expected {
            Ok(())
        } else {
            Err(EnergyBalanceError::ShapeMismatch {
                field,
                expected,
                actual: self.shape(),
            })
        }
    }
}
