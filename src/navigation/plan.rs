// navigation/plan.rs

// Mission-plan adapter: wraps a coverage graph as a single follow-path
// maneuver and hands it to an exporter. The exporters only serialize; storing
// or dispatching the plan belongs to whoever consumes the file.

// Dependencies
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use super::coverage::WaypointGraph;

/// Plan maneuvers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Maneuver {
    /// Follow every waypoint of the graph along its transitions
    FollowPath {
        /// Maneuver id
        id: String,
        /// Path to follow
        graph: WaypointGraph,
    },
}

impl Maneuver {
    /// Maneuver id
    pub fn id(&self) -> &str {
        match self {
            Maneuver::FollowPath { id, .. } => id,
        }
    }
}

/// Mission plan ready for export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    /// Plan id
    pub id: String,
    /// Id of the maneuver the plan starts with
    pub initial_maneuver: String,
    /// Plan maneuvers
    pub maneuvers: Vec<Maneuver>,
}

/// Wraps `graph` as a plan with one follow-path maneuver
pub fn to_mission_plan(graph: WaypointGraph, plan_id: &str) -> Result<MissionPlan, PlanError> {
    if graph.initial_node().is_none() {
        return Err(PlanError::EmptyGraph);
    }

    let maneuver_id = format!("{}-coverage", plan_id);
    Ok(MissionPlan {
        id: plan_id.to_string(),
        initial_maneuver: maneuver_id.clone(),
        maneuvers: vec![Maneuver::FollowPath {
            id: maneuver_id,
            graph,
        }],
    })
}

/// Destination of finished plans
#[cfg_attr(test, mockall::automock)]
pub trait PlanExporter {
    /// Exports a plan
    fn export(&mut self, plan: &MissionPlan) -> Result<(), PlanError>;
}

/// On-disk plan encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFormat {
    /// YAML document
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Writes plans to a file
#[derive(Clone, Debug)]
pub struct FilePlanExporter {
    path: PathBuf,
    format: PlanFormat,
}

impl FilePlanExporter {
    /// Creates an exporter writing to `path`
    pub fn new(path: impl AsRef<Path>, format: PlanFormat) -> Self {
        FilePlanExporter {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `plan` in the configured format
    pub fn render(&self, plan: &MissionPlan) -> Result<String, PlanError> {
        match self.format {
            PlanFormat::Yaml => serde_yaml::to_string(plan)
                .map_err(|e| PlanError::Serialization(e.to_string())),
            PlanFormat::Json => serde_json::to_string_pretty(plan)
                .map_err(|e| PlanError::Serialization(e.to_string())),
        }
    }
}

impl PlanExporter for FilePlanExporter {
    fn export(&mut self, plan: &MissionPlan) -> Result<(), PlanError> {
        let text = self.render(plan)?;
        fs::write(&self.path, text).map_err(|e| PlanError::Io(e.to_string()))?;
        info!("Saved plan {} to {}", plan.id, self.path.display());
        Ok(())
    }
}

/// Plan export error types
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Graph has no initial waypoint
    EmptyGraph,
    /// Plan could not be serialized
    Serialization(String),
    /// Plan could not be written
    Io(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlanError::EmptyGraph => write!(f, "Coverage graph has no initial waypoint"),
            PlanError::Serialization(msg) => write!(f, "Plan serialization error: {}", msg),
            PlanError::Io(msg) => write!(f, "Plan write error: {}", msg),
        }
    }
}

impl std::error::Error for PlanError {}
