// navigation/coverage.rs

// Turns a decomposition into a coverage graph: one waypoint per cell center,
// linked in raster-scan order (left to right, top row to bottom row) into a
// single path that visits every cell once.

// Dependencies
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::geometry::Location;
use crate::decomposition::{CellId, CellMatrix, GridArea, MapCell};

/// Graph node: a waypoint at a cell center
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Waypoint id, `"<row> <col>"`
    pub id: String,
    /// Cell this waypoint was built from
    pub cell: CellId,
    /// Target location
    pub location: Location,
    /// Whether the plan starts here
    pub initial: bool,
    /// Obstacle flag of the cell when the graph was built. The path does
    /// not avoid these; consumers decide what to do with them.
    #[serde(default)]
    pub obstacle: bool,
}

/// Directed graph edge between two waypoint ids
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Source waypoint id
    pub source: String,
    /// Target waypoint id
    pub target: String,
}

/// Self-contained coverage graph, detached from the grid it came from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointGraph {
    nodes: Vec<Waypoint>,
    edges: Vec<Transition>,
}

impl WaypointGraph {
    /// Nodes in row-major cell order
    pub fn nodes(&self) -> &[Waypoint] {
        &self.nodes
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Transition] {
        &self.edges
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node with the given id
    pub fn node(&self, id: &str) -> Option<&Waypoint> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The node flagged as initial
    pub fn initial_node(&self) -> Option<&Waypoint> {
        self.nodes.iter().find(|n| n.initial)
    }

    /// Target of the first edge leaving `id`
    pub fn successor(&self, id: &str) -> Option<&Waypoint> {
        self.edges
            .iter()
            .find(|e| e.source == id)
            .and_then(|e| self.node(&e.target))
    }

    /// Waypoints reached by following edges from the initial node. Stops at
    /// the first node with no outgoing edge or at a revisit.
    pub fn path(&self) -> Vec<&Waypoint> {
        let mut path = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::new();
        let mut current = self.initial_node();

        while let Some(node) = current {
            if !visited.insert(node.id.as_str()) {
                break;
            }
            path.push(node);
            current = self.successor(&node.id);
        }
        path
    }
}

/// Builds raster-scan coverage graphs
#[derive(Clone, Debug, Default)]
pub struct CoverageGraphBuilder;

impl CoverageGraphBuilder {
    /// Creates a builder
    pub fn new() -> Self {
        CoverageGraphBuilder
    }

    /// Builds the coverage graph of `area`. Works on a snapshot so the grid
    /// lock is released before the graph is assembled. Obstacles are copied
    /// onto the waypoints but do not change the path.
    pub fn build_graph(&self, area: &GridArea) -> WaypointGraph {
        let cells = area.snapshot();
        let graph = self.build_from_cells(&cells);
        info!(
            "Built coverage graph: {} waypoints, {} transitions",
            graph.nodes.len(),
            graph.edges.len()
        );
        graph
    }

    /// Builds the coverage graph of any cell matrix
    pub fn build_from_cells<C: MapCell>(&self, cells: &CellMatrix<C>) -> WaypointGraph {
        let (rows, cols) = (cells.rows(), cells.cols());
        let mut graph = WaypointGraph {
            nodes: Vec::with_capacity(rows * cols),
            edges: Vec::with_capacity((rows * cols).saturating_sub(1)),
        };

        for cell in cells.iter() {
            let id = cell.id();
            graph.nodes.push(Waypoint {
                id: id.to_string(),
                cell: id,
                location: cell.location(),
                initial: id.row == 0 && id.col == 0,
                obstacle: cell.has_obstacle(),
            });
        }

        for row in 0..rows {
            for col in 0..cols {
                let next = if col + 1 < cols {
                    CellId::new(row, col + 1)
                } else if row + 1 < rows {
                    CellId::new(row + 1, 0)
                } else {
                    continue;
                };

                graph.edges.push(Transition {
                    source: CellId::new(row, col).to_string(),
                    target: next.to_string(),
                });
            }
        }

        debug!("Raster scan over {}x{} cells", rows, cols);
        graph
    }
}
