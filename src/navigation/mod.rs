//! Coverage planning for survey missions
//!
//! This module converts a decomposed area into a waypoint graph and wraps it
//! as a mission plan for export.

pub mod coverage;
pub mod plan;

pub use coverage::{CoverageGraphBuilder, Transition, Waypoint, WaypointGraph};
pub use plan::{
    to_mission_plan, FilePlanExporter, Maneuver, MissionPlan, PlanError, PlanExporter, PlanFormat,
};
