// decomposition/error.rs

use std::fmt;
use super::cell::CellId;

/// Decomposition error types
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Polygon has fewer than 3 vertices or a zero-area extent
    InvalidPolygon(String),
    /// Cell width is not a positive, finite number of meters
    InvalidCellWidth(f64),
    /// Row/column outside the grid
    IndexOutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows in the grid
        rows: usize,
        /// Number of columns in the grid
        cols: usize,
    },
    /// Every cell is blocked by an obstacle
    NoFreeCell,
    /// The reference cell given to an anticlockwise query is not adjacent
    NotNeighbour {
        /// Cell being queried
        cell: CellId,
        /// Cell that was expected to be its neighbour
        other: CellId,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::InvalidPolygon(msg) => write!(f, "Invalid polygon: {}", msg),
            GridError::InvalidCellWidth(width) => write!(f, "Invalid cell width: {}", width),
            GridError::IndexOutOfRange { row, col, rows, cols } => write!(
                f,
                "Cell ({}, {}) out of range for a {}x{} grid",
                row, col, rows, cols
            ),
            GridError::NoFreeCell => write!(f, "No free cell in grid"),
            GridError::NotNeighbour { cell, other } => {
                write!(f, "Cell {} is not a neighbour of cell {}", other, cell)
            }
        }
    }
}

impl std::error::Error for GridError {}
