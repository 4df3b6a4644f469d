//! Coverage Planner - survey area decomposition and coverage paths
//!
//! This library splits a survey polygon into a uniform grid of cells, tracks
//! obstacles and adjacency per cell, refines and rotates the decomposition,
//! and turns it into a raster-scan waypoint graph exported as a mission plan.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod geometry;
pub mod decomposition;
pub mod navigation;

// Re-export commonly used items for easier access
pub use geometry::{Location, Polygon};
pub use decomposition::{CellId, CellMatrix, GridArea, GridCell, GridError, MapCell};
pub use navigation::{
    CoverageGraphBuilder, FilePlanExporter, MissionPlan, PlanError, PlanExporter, PlanFormat,
    WaypointGraph,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Planning session configuration, usually loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Id of the generated plan
    pub plan_id: String,
    /// Cell width in meters
    pub cell_width: f64,
    /// Survey area
    pub polygon: Polygon,
    /// Cells to mark as obstacles, indexed on the final grid
    pub obstacles: Vec<CellId>,
    /// Split the grid into 2x2 sub-cells once before planning
    pub refine: bool,
    /// Rotation (radians) applied to the grid after decomposition
    pub rotation: f64,
    /// Plan output path
    pub output: PathBuf,
    /// Plan output format
    pub format: PlanFormat,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            plan_id: "coverage".to_string(),
            cell_width: 60.0,
            polygon: Polygon::new(),
            obstacles: Vec::new(),
            refine: false,
            rotation: 0.0,
            output: PathBuf::from("coverage_plan.yaml"),
            format: PlanFormat::Yaml,
        }
    }
}

impl PlannerConfig {
    /// Loads a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PlannerError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| PlannerError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: PlannerConfig = serde_yaml::from_reader(file)
            .map_err(|e| PlannerError::ConfigError(format!("{}: {}", path.display(), e)))?;

        info!("Loaded planner config from {}", path.display());
        Ok(config)
    }
}

/// A planning session: polygon in, mission plan out
pub struct CoveragePlanner {
    config: PlannerConfig,
    builder: CoverageGraphBuilder,
}

impl CoveragePlanner {
    /// Create a planner for the given configuration
    pub fn new(config: PlannerConfig) -> Self {
        CoveragePlanner {
            config,
            builder: CoverageGraphBuilder::new(),
        }
    }

    /// Session configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Decomposes the configured polygon, applying rotation, refinement and
    /// obstacles in that order
    pub fn decompose(&self) -> Result<GridArea, PlannerError> {
        let area = GridArea::new(&self.config.polygon, self.config.cell_width)?;
        if self.config.rotation != 0.0 {
            area.rotate(self.config.rotation);
        }

        let area = if self.config.refine {
            area.split_mega_cells()
        } else {
            area
        };

        for id in &self.config.obstacles {
            area.set_obstacle_at(true, id.row, id.col)?;
        }

        match area.get_first_free_cell() {
            Ok(cell) => info!("First free cell at {}", cell.id()),
            Err(GridError::NoFreeCell) => warn!("Every cell of the survey area is blocked"),
            Err(e) => return Err(e.into()),
        }

        Ok(area)
    }

    /// Builds the mission plan for the configured area
    pub fn plan(&self) -> Result<MissionPlan, PlannerError> {
        let area = self.decompose()?;
        let graph = self.builder.build_graph(&area);
        Ok(navigation::to_mission_plan(graph, &self.config.plan_id)?)
    }

    /// Builds the plan and hands it to `exporter`
    pub fn run(&self, exporter: &mut dyn PlanExporter) -> Result<MissionPlan, PlannerError> {
        let plan = self.plan()?;
        exporter.export(&plan)?;
        info!("Plan {} exported", plan.id);
        Ok(plan)
    }
}

/// Coverage planner error types
#[derive(Debug)]
pub enum PlannerError {
    /// Decomposition error
    GridError(GridError),
    /// Plan export error
    PlanError(PlanError),
    /// Configuration error
    ConfigError(String),
}

impl std::fmt::Display for PlannerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PlannerError::GridError(e) => write!(f, "Grid error: {}", e),
            PlannerError::PlanError(e) => write!(f, "Plan error: {}", e),
            PlannerError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::GridError(e) => Some(e),
            PlannerError::PlanError(e) => Some(e),
            PlannerError::ConfigError(_) => None,
        }
    }
}

impl From<GridError> for PlannerError {
    fn from(e: GridError) -> Self {
        PlannerError::GridError(e)
    }
}

impl From<PlanError> for PlannerError {
    fn from(e: PlanError) -> Self {
        PlannerError::PlanError(e)
    }
}
