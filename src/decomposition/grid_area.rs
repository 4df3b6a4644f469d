// decomposition/grid_area.rs

// Uniform grid decomposition of a survey polygon. The grid is aligned with the
// polygon's first edge; rows run across it and columns along it. The cell
// matrix sits behind a mutex so obstacle annotation and readers (renderers,
// graph builders) can share one GridArea across threads.

// Dependencies
use log::{debug, info, warn};
use nalgebra::Vector2;
use std::sync::{Mutex, MutexGuard, PoisonError};
use crate::geometry::{Location, Polygon};
use super::cell::{CellId, GridCell, MapCell};
use super::error::GridError;
use super::matrix::CellMatrix;

/// Lengths below this (meters) count as degenerate
const MIN_EXTENT: f64 = 1e-6;
/// Extent/width ratios this close to an integer are not rounded up
const RATIO_TOLERANCE: f64 = 1e-6;
/// Largest number of cells a single decomposition may hold
pub const MAX_CELLS: usize = 1 << 24;

/// Planar frame the grid is laid out in. Vectors are `(east, north)` meters
/// relative to `reference`.
#[derive(Clone, Debug)]
struct GridFrame {
    reference: Location,
    axis_u: Vector2<f64>,
    axis_v: Vector2<f64>,
    corner: Vector2<f64>,
}

impl GridFrame {
    /// Location `along` meters down the first-edge axis and `across` meters
    /// away from the top edge, measured from the grid corner
    fn point(&self, along: f64, across: f64) -> Location {
        let p = self.corner + self.axis_u * along - self.axis_v * across;
        self.reference.translated(p.y, p.x, 0.0)
    }

    fn cell_center(&self, row: usize, col: usize, cell_width: f64) -> Location {
        self.point(
            (col as f64 + 0.5) * cell_width,
            (row as f64 + 0.5) * cell_width,
        )
    }

    fn yaw(&self) -> f64 {
        self.axis_u.y.atan2(self.axis_u.x)
    }
}

#[derive(Debug)]
struct GridState {
    cells: CellMatrix<GridCell>,
    rotation: f64,
}

/// Grid of square cells covering a polygon
#[derive(Debug)]
pub struct GridArea {
    frame: GridFrame,
    rows: usize,
    cols: usize,
    cell_width: f64,
    center: Location,
    state: Mutex<GridState>,
}

impl GridArea {
    /// Decomposes `polygon` into cells `cell_width` meters wide.
    ///
    /// The polygon's first edge gives one principal axis; the extents of all
    /// vertices along that axis and its perpendicular give the grid's width
    /// and height. The polygon is only read here. A width that would need
    /// more than [`MAX_CELLS`] cells is rejected as `InvalidCellWidth`.
    pub fn new(polygon: &Polygon, cell_width: f64) -> Result<Self, GridError> {
        if !(cell_width.is_finite() && cell_width > 0.0) {
            warn!("Rejected cell width {}", cell_width);
            return Err(GridError::InvalidCellWidth(cell_width));
        }

        let vertices = polygon.vertices();
        if vertices.len() < 3 {
            warn!("Rejected {}: at least 3 vertices required", polygon);
            return Err(GridError::InvalidPolygon(format!(
                "{} vertices, at least 3 required",
                vertices.len()
            )));
        }

        let reference = vertices[0];
        let points: Vec<Vector2<f64>> = vertices
            .iter()
            .map(|v| {
                let offset = v.offset_from(&reference);
                Vector2::new(offset.y, offset.x)
            })
            .collect();

        let edge = points[1] - points[0];
        if edge.norm() < MIN_EXTENT {
            warn!("Rejected {}: first edge has zero length", polygon);
            return Err(GridError::InvalidPolygon("first edge has zero length".to_string()));
        }
        let axis_u = edge.normalize();
        let axis_v = Vector2::new(-axis_u.y, axis_u.x);

        let (min_u, max_u) = projection_range(&points, &axis_u);
        let (min_v, max_v) = projection_range(&points, &axis_v);
        let width = max_u - min_u;
        let height = max_v - min_v;
        if width < MIN_EXTENT || height < MIN_EXTENT {
            warn!("Rejected {}: zero-area extent ({:.3} x {:.3} m)", polygon, width, height);
            return Err(GridError::InvalidPolygon(format!(
                "zero-area extent ({} x {} m)",
                width, height
            )));
        }

        let frame = GridFrame {
            reference,
            axis_u,
            axis_v,
            corner: axis_u * min_u + axis_v * max_v,
        };
        let mid = axis_u * ((min_u + max_u) / 2.0) + axis_v * ((min_v + max_v) / 2.0);
        let center = reference.translated(mid.y, mid.x, 0.0);

        let rows = cells_along(height, cell_width);
        let cols = cells_along(width, cell_width);
        match rows.checked_mul(cols) {
            Some(count) if count <= MAX_CELLS => {}
            _ => {
                warn!(
                    "Rejected cell width {}: {:.1} x {:.1} m needs more than {} cells",
                    cell_width, width, height, MAX_CELLS
                );
                return Err(GridError::InvalidCellWidth(cell_width));
            }
        }
        info!(
            "Decomposed {} ({:.1} x {:.1} m) into a {}x{} grid of {} m cells",
            polygon, width, height, rows, cols, cell_width
        );

        Ok(GridArea::build(frame, rows, cols, cell_width, center, 0.0))
    }

    fn build(
        frame: GridFrame,
        rows: usize,
        cols: usize,
        cell_width: f64,
        center: Location,
        rotation: f64,
    ) -> Self {
        let mut cells = CellMatrix::from_fn(rows, cols, |row, col| {
            let mut cell = GridCell::new(row, col, frame.cell_center(row, col, cell_width));
            if rotation != 0.0 {
                cell.rotate(rotation, &center);
            }
            cell
        });
        wire_four_connected(&mut cells);

        GridArea {
            frame,
            rows,
            cols,
            cell_width,
            center,
            state: Mutex::new(GridState { cells, rotation }),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell width in meters
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Center of the covered extent
    pub fn center_location(&self) -> Location {
        self.center
    }

    /// Nominal heading of the column axis (radians, counter-clockwise from
    /// east), including any rotation applied with [`GridArea::rotate`]
    pub fn orientation(&self) -> f64 {
        self.frame.yaw() + self.lock().rotation
    }

    /// Corners of the covered rectangle, clockwise from the grid's (0,0)
    /// corner, before any rotation
    pub fn corners(&self) -> [Location; 4] {
        let width = self.cols as f64 * self.cell_width;
        let height = self.rows as f64 * self.cell_width;
        [
            self.frame.point(0.0, 0.0),
            self.frame.point(width, 0.0),
            self.frame.point(width, height),
            self.frame.point(0.0, height),
        ]
    }

    /// Sets the obstacle flag of the cell at `(row, col)`. Adjacency is not
    /// changed.
    pub fn set_obstacle_at(&self, value: bool, row: usize, col: usize) -> Result<(), GridError> {
        let mut state = self.lock();
        let cell = state.cells.cell_at_mut(row, col)?;
        cell.set_obstacle(value);
        debug!("Cell {} obstacle set to {}", cell.id(), value);
        Ok(())
    }

    /// First unobstructed cell in row-major order
    pub fn get_first_free_cell(&self) -> Result<GridCell, GridError> {
        self.lock()
            .cells
            .iter()
            .find(|cell| !cell.has_obstacle())
            .cloned()
            .ok_or(GridError::NoFreeCell)
    }

    /// Copy of the cell at `(row, col)`
    pub fn cell_at(&self, row: usize, col: usize) -> Result<GridCell, GridError> {
        self.lock().cells.cell_at(row, col).cloned()
    }

    /// Copy of every cell, row-major
    pub fn all_cells(&self) -> Vec<GridCell> {
        self.lock().cells.iter().cloned().collect()
    }

    /// Copy of the whole cell matrix, for consumers that resolve neighbours
    pub fn snapshot(&self) -> CellMatrix<GridCell> {
        self.lock().cells.clone()
    }

    /// Unobstructed cells, row-major
    pub fn free_cells(&self) -> Vec<GridCell> {
        self.lock()
            .cells
            .iter()
            .filter(|cell| !cell.has_obstacle())
            .cloned()
            .collect()
    }

    /// Number of cells flagged as obstacles
    pub fn obstacle_count(&self) -> usize {
        self.lock().cells.iter().filter(|cell| cell.has_obstacle()).count()
    }

    /// Free neighbours of the cell at `(row, col)`
    pub fn neighbours_of(&self, row: usize, col: usize) -> Result<Vec<GridCell>, GridError> {
        let state = self.lock();
        let cell = state.cells.cell_at(row, col)?;
        Ok(cell.neighbours(&state.cells).into_iter().cloned().collect())
    }

    /// Free neighbours of the cell at `(row, col)`, counter-clockwise from
    /// `first`
    pub fn neighbours_anticlockwise_of(
        &self,
        row: usize,
        col: usize,
        first: CellId,
    ) -> Result<Vec<GridCell>, GridError> {
        let state = self.lock();
        let cell = state.cells.cell_at(row, col)?;
        let first = state.cells.cell_at(first.row, first.col)?;
        let ordered = cell.neighbours_anticlockwise(first, &state.cells)?;
        Ok(ordered.into_iter().cloned().collect())
    }

    /// Rotates every cell center by `yaw` radians about the grid center
    pub fn rotate(&self, yaw: f64) {
        let mut state = self.lock();
        for cell in state.cells.iter_mut() {
            cell.rotate(yaw, &self.center);
        }
        state.rotation += yaw;
        debug!("Grid rotated by {:.4} rad (total {:.4})", yaw, state.rotation);
    }

    /// Refines the grid: returns a new area with twice the rows and columns
    /// over the same extent and center. Each cell becomes a 2x2 block of
    /// half-width cells; obstacle flags are not carried over.
    pub fn split_mega_cells(&self) -> GridArea {
        let rotation = self.lock().rotation;
        let area = GridArea::build(
            self.frame.clone(),
            self.rows * 2,
            self.cols * 2,
            self.cell_width / 2.0,
            self.center,
            rotation,
        );
        info!(
            "Split {}x{} grid into {}x{} sub-cells",
            self.rows, self.cols, area.rows, area.cols
        );
        area
    }

    fn lock(&self) -> MutexGuard<'_, GridState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Connects every pair of cells sharing a grid edge
fn wire_four_connected(cells: &mut CellMatrix<GridCell>) {
    let (rows, cols) = (cells.rows(), cells.cols());
    for row in 0..rows {
        for col in 0..cols {
            let here = CellId::new(row, col);
            if col + 1 < cols {
                cells.connect(here, CellId::new(row, col + 1));
            }
            if row + 1 < rows {
                cells.connect(here, CellId::new(row + 1, col));
            }
        }
    }
}

/// Min and max projection of `points` onto `axis`
fn projection_range(points: &[Vector2<f64>], axis: &Vector2<f64>) -> (f64, f64) {
    points
        .iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)))
}

/// `ceil(extent / cell_width)`, ignoring round-off from the geodetic
/// conversions. A trailing strip thinner than `RATIO_TOLERANCE * cell_width`
/// meters (1 micrometer for 1 m cells) gets no cell of its own and is left
/// uncovered.
fn cells_along(extent: f64, cell_width: f64) -> usize {
    let ratio = extent / cell_width;
    let nearest = ratio.round();
    let count = if (ratio - nearest).abs() < RATIO_TOLERANCE {
        nearest
    } else {
        ratio.ceil()
    };
    (count as usize).max(1)
}
