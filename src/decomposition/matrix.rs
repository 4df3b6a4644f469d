// decomposition/matrix.rs

// Owned, row-major storage for the cells of a decomposition. Adjacency is
// expressed as CellId indices into this container.

use serde::{Deserialize, Serialize};
use super::cell::{CellId, MapCell};
use super::error::GridError;

/// Row-major `rows x cols` collection of cells
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellMatrix<C> {
    rows: usize,
    cols: usize,
    cells: Vec<C>,
}

impl<C: MapCell> CellMatrix<C> {
    /// Builds a matrix by calling `make(row, col)` for every position in
    /// row-major order
    pub fn from_fn(rows: usize, cols: usize, mut make: impl FnMut(usize, usize) -> C) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(make(row, col));
            }
        }

        CellMatrix { rows, cols, cells }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the matrix holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell with the given id, if inside the matrix
    pub fn get(&self, id: CellId) -> Option<&C> {
        self.index_of(id.row, id.col).map(|i| &self.cells[i])
    }

    /// Mutable cell with the given id, if inside the matrix
    pub fn get_mut(&mut self, id: CellId) -> Option<&mut C> {
        self.index_of(id.row, id.col).map(move |i| &mut self.cells[i])
    }

    /// Cell at `(row, col)` or an out-of-range error
    pub fn cell_at(&self, row: usize, col: usize) -> Result<&C, GridError> {
        let index = self.checked_index(row, col)?;
        Ok(&self.cells[index])
    }

    /// Mutable cell at `(row, col)` or an out-of-range error
    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Result<&mut C, GridError> {
        let index = self.checked_index(row, col)?;
        Ok(&mut self.cells[index])
    }

    /// Cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cells.iter()
    }

    /// Mutable cells in row-major order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.cells.iter_mut()
    }

    /// Registers a symmetric adjacency between two cells of this matrix.
    /// Returns `false` when either id is outside the matrix, both ids are
    /// equal, or the cells are already neighbours.
    pub fn connect(&mut self, a: CellId, b: CellId) -> bool {
        let (Some(ia), Some(ib)) = (self.index_of(a.row, a.col), self.index_of(b.row, b.col)) else {
            return false;
        };
        if ia == ib {
            return false;
        }

        let (low, high) = (ia.min(ib), ia.max(ib));
        let (head, tail) = self.cells.split_at_mut(high);
        head[low].add_neighbour(&mut tail[0])
    }

    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        self.index_of(row, col).ok_or(GridError::IndexOutOfRange {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })
    }
}
