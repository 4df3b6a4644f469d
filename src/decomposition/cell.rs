//! Decomposition cells
//!
//! [`MapCell`] is the capability set every cell shape offers to the grid and
//! to the planners. [`GridCell`] is the square cell used by [`GridArea`].
//! Neighbours are stored as [`CellId`]s and resolved through the owning
//! [`CellMatrix`], so cells never hold references to each other.
//!
//! [`GridArea`]: super::GridArea

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use crate::geometry::Location;
use super::error::GridError;
use super::matrix::CellMatrix;

/// Row/column identity of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl CellId {
    /// Creates a cell id
    pub fn new(row: usize, col: usize) -> Self {
        CellId { row, col }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Capabilities of a single decomposition unit
pub trait MapCell: Clone {
    /// Identity of this cell
    fn id(&self) -> CellId;

    /// Whether the cell is blocked
    fn has_obstacle(&self) -> bool;

    /// Marks or clears the obstacle flag
    fn set_obstacle(&mut self, value: bool);

    /// Registers `other` as a neighbour of this cell and this cell as a
    /// neighbour of `other`. Returns `false` (and changes nothing) when the
    /// relation already exists or both are the same cell.
    fn add_neighbour(&mut self, other: &mut Self) -> bool;

    /// Every registered neighbour, obstacles included, in insertion order
    fn raw_neighbours(&self) -> &[CellId];

    /// Center location of the cell
    fn location(&self) -> Location;

    /// Rotates the cell's center by `yaw` radians about `pivot`. Adjacency is
    /// left untouched.
    fn rotate(&mut self, yaw: f64, pivot: &Location);

    /// Whether `other` is a registered neighbour, regardless of obstacles
    fn is_neighbour(&self, other: &Self) -> bool {
        self.raw_neighbours().contains(&other.id())
    }

    /// Registered neighbours that are not blocked
    fn neighbours<'a>(&self, cells: &'a CellMatrix<Self>) -> Vec<&'a Self> {
        self.raw_neighbours()
            .iter()
            .filter_map(|id| cells.get(*id))
            .filter(|cell| !cell.has_obstacle())
            .collect()
    }

    /// Free neighbours ordered counter-clockwise by bearing from this cell's
    /// center, starting at `first` (bearing 0). `first` is included when it
    /// is free. Equal bearings keep insertion order.
    fn neighbours_anticlockwise<'a>(
        &self,
        first: &Self,
        cells: &'a CellMatrix<Self>,
    ) -> Result<Vec<&'a Self>, GridError> {
        if !self.is_neighbour(first) {
            return Err(GridError::NotNeighbour {
                cell: self.id(),
                other: first.id(),
            });
        }

        let origin = self.location();
        let bearing = |location: Location| {
            let offset = location.offset_from(&origin);
            // counter-clockwise from east
            offset.x.atan2(offset.y)
        };
        let reference = bearing(first.location());

        let mut ordered: Vec<(f64, &'a Self)> = self
            .neighbours(cells)
            .into_iter()
            .map(|cell| ((bearing(cell.location()) - reference).rem_euclid(TAU), cell))
            .collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(ordered.into_iter().map(|(_, cell)| cell).collect())
    }
}

/// Square grid cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    id: CellId,
    has_obstacle: bool,
    location: Location,
    neighbours: Vec<CellId>,
}

impl GridCell {
    /// Creates an unobstructed cell with no neighbours
    pub fn new(row: usize, col: usize, location: Location) -> Self {
        GridCell {
            id: CellId::new(row, col),
            has_obstacle: false,
            location,
            neighbours: Vec::with_capacity(4),
        }
    }

    /// Row index
    pub fn row(&self) -> usize {
        self.id.row
    }

    /// Column index
    pub fn col(&self) -> usize {
        self.id.col
    }
}

impl MapCell for GridCell {
    fn id(&self) -> CellId {
        self.id
    }

    fn has_obstacle(&self) -> bool {
        self.has_obstacle
    }

    fn set_obstacle(&mut self, value: bool) {
        self.has_obstacle = value;
    }

    fn add_neighbour(&mut self, other: &mut Self) -> bool {
        if self.id == other.id || self.neighbours.contains(&other.id) {
            return false;
        }

        self.neighbours.push(other.id);
        if !other.neighbours.contains(&self.id) {
            other.neighbours.push(self.id);
        }
        true
    }

    fn raw_neighbours(&self) -> &[CellId] {
        &self.neighbours
    }

    fn location(&self) -> Location {
        self.location
    }

    fn rotate(&mut self, yaw: f64, pivot: &Location) {
        self.location = self.location.rotate_around(pivot, yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_shape() -> CellMatrix<GridCell> {
        // 3x3 with the center connected to its four edge neighbours only
        let origin = Location::new(41.1781, -8.5954);
        let mut cells = CellMatrix::from_fn(3, 3, |row, col| {
            let location = origin.translated(-(row as f64) * 10.0, col as f64 * 10.0, 0.0);
            GridCell::new(row, col, location)
        });
        let center = CellId::new(1, 1);
        for other in [CellId::new(0, 1), CellId::new(1, 0), CellId::new(2, 1), CellId::new(1, 2)] {
            cells.connect(center, other);
        }
        cells
    }

    #[test]
    fn add_neighbour_is_symmetric_and_unique() {
        let mut a = GridCell::new(0, 0, Location::new(0.0, 0.0));
        let mut b = GridCell::new(0, 1, Location::new(0.0, 0.001));

        assert!(a.add_neighbour(&mut b));
        assert!(!a.add_neighbour(&mut b));
        assert!(!b.add_neighbour(&mut a));
        assert!(a.is_neighbour(&b) && b.is_neighbour(&a));
        assert_eq!(a.raw_neighbours().len(), 1);
        assert_eq!(b.raw_neighbours().len(), 1);

        let mut c = a.clone();
        assert!(!a.add_neighbour(&mut c));
    }

    #[test]
    fn obstacles_are_hidden_from_filtered_view() {
        let mut cells = plus_shape();
        cells.get_mut(CellId::new(0, 1)).unwrap().set_obstacle(true);

        let center = cells.get(CellId::new(1, 1)).unwrap();
        let free: Vec<CellId> = center.neighbours(&cells).iter().map(|c| c.id()).collect();
        assert_eq!(free.len(), 3);
        assert!(!free.contains(&CellId::new(0, 1)));

        let blocked = cells.get(CellId::new(0, 1)).unwrap();
        assert!(center.is_neighbour(blocked));
    }

    #[test]
    fn anticlockwise_order_starts_at_first() {
        let cells = plus_shape();
        let center = cells.get(CellId::new(1, 1)).unwrap();
        // east neighbour, then north, west, south
        let east = cells.get(CellId::new(1, 2)).unwrap();

        let order: Vec<CellId> = center
            .neighbours_anticlockwise(east, &cells)
            .unwrap()
            .iter()
            .map(|c| c.id())
            .collect();

        assert_eq!(
            order,
            vec![CellId::new(1, 2), CellId::new(0, 1), CellId::new(1, 0), CellId::new(2, 1)]
        );
    }

    #[test]
    fn anticlockwise_rejects_non_neighbour() {
        let cells = plus_shape();
        let center = cells.get(CellId::new(1, 1)).unwrap();
        let corner = cells.get(CellId::new(0, 0)).unwrap();

        assert_eq!(
            center.neighbours_anticlockwise(corner, &cells),
            Err(GridError::NotNeighbour {
                cell: CellId::new(1, 1),
                other: CellId::new(0, 0),
            })
        );
    }

    #[test]
    fn rotate_moves_location_only() {
        let cells = plus_shape();
        let pivot = cells.get(CellId::new(1, 1)).unwrap().location();
        let mut cell = cells.get(CellId::new(1, 2)).unwrap().clone();
        let before = cell.raw_neighbours().to_vec();

        cell.rotate(std::f64::consts::PI, &pivot);
        assert_ne!(cell.location(), cells.get(CellId::new(1, 2)).unwrap().location());
        assert_eq!(cell.raw_neighbours(), before.as_slice());
    }
}
