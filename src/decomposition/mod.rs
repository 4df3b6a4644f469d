//! Area decomposition
//!
//! Splits a survey polygon into a uniform grid of cells with 4-connected
//! adjacency, per-cell obstacle flags and 2x2 refinement.

pub mod cell;
pub mod error;
pub mod grid_area;
pub mod matrix;

pub use cell::{CellId, GridCell, MapCell};
pub use error::GridError;
pub use grid_area::{GridArea, MAX_CELLS};
pub use matrix::CellMatrix;
