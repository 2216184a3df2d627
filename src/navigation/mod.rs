//! Navigation system for Maze RRG
//!
//! This module grows the roadmap, checks moves against walls and the moving
//! obstacle, extracts the fewest-edge route and turns it into a policy.
//! Both planner variants share the same builder and differ only in the
//! [`HazardCheck`] they inject.

pub mod collision;
pub mod controller;
pub mod planner;
pub mod roadmap;
pub mod search;

pub use collision::{Blockage, ForecastHazard, HazardCheck, HazardReport, HorizonOnly};
pub use controller::{PolicyController, displacement, expand_policy, synthesize};
pub use planner::{CancelToken, Plan, PlanBudget, PlanHandle, Planner, PlannerKind, audit_path};
pub use roadmap::{GrowthStep, MoveFault, Rejection, Roadmap, RoadmapBuilder};
pub use search::{HopIndex, bfs};

use crate::forecast::ForecastError;
use crate::geometry::Waypoint;
use serde::{Deserialize, Serialize};

/// Roadmap growth parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadmapConfig {
    /// Half-width M of the square map `[-M, M]²`
    pub map_size: f64,
    /// Length r of one micro-step
    pub step_resolution: f64,
    /// Micro-steps k per macro-step (one roadmap edge)
    pub step_size: usize,
    /// Coordinate gap an axis must exceed before the heading moves along it
    pub direction_threshold: f64,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        RoadmapConfig {
            map_size: 12.0,
            step_resolution: 0.25,
            step_size: 10,
            direction_threshold: 1.0,
        }
    }
}

impl RoadmapConfig {
    /// Length of one macro-step, `r·k`
    pub fn agent_step(&self) -> f64 {
        self.step_resolution * self.step_size as f64
    }

    /// Checks the parameters the growth loop depends on
    pub fn validate(&self) -> Result<(), NavigationError> {
        if !self.map_size.is_finite() || self.map_size <= 0.0 {
            return Err(NavigationError::InvalidConfig(format!(
                "map_size must be finite and positive, got {}",
                self.map_size
            )));
        }
        if !self.step_resolution.is_finite() || self.step_resolution <= 0.0 {
            return Err(NavigationError::InvalidConfig(format!(
                "step_resolution must be finite and positive, got {}",
                self.step_resolution
            )));
        }
        if self.step_size == 0 {
            return Err(NavigationError::InvalidConfig(
                "step_size must be at least 1".to_string(),
            ));
        }
        if !self.direction_threshold.is_finite() || self.direction_threshold < 0.0 {
            return Err(NavigationError::InvalidConfig(format!(
                "direction_threshold must be finite and non-negative, got {}",
                self.direction_threshold
            )));
        }
        Ok(())
    }
}

/// Navigation error types
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// The growth budget ran out before a node reached the target
    NoPath {
        /// Samples drawn before giving up
        iterations: u64,
    },
    /// The caller cancelled the growth loop
    Cancelled {
        /// Samples drawn before cancellation
        iterations: u64,
    },
    /// The final route crosses the predicted obstacle
    Collision {
        /// Offending waypoint
        waypoint: Waypoint,
        /// Time index at which the waypoint is reached
        time_index: usize,
    },
    /// The forecaster could not produce a usable prediction
    Forecast(ForecastError),
    /// A route does not follow roadmap edges
    InvalidPath(String),
    /// Planner parameters are unusable
    InvalidConfig(String),
    /// The background planning thread panicked
    WorkerPanicked,
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NavigationError::NoPath { iterations } => {
                write!(f, "No path found within budget ({} samples)", iterations)
            }
            NavigationError::Cancelled { iterations } => {
                write!(f, "Planning cancelled after {} samples", iterations)
            }
            NavigationError::Collision {
                waypoint,
                time_index,
            } => write!(
                f,
                "Route collides with predicted obstacle at {} (t={})",
                waypoint, time_index
            ),
            NavigationError::Forecast(e) => write!(f, "Forecast error: {}", e),
            NavigationError::InvalidPath(msg) => write!(f, "Invalid path: {}", msg),
            NavigationError::InvalidConfig(msg) => write!(f, "Invalid planner config: {}", msg),
            NavigationError::WorkerPanicked => write!(f, "Planning worker panicked"),
        }
    }
}

impl std::error::Error for NavigationError {}

impl From<ForecastError> for NavigationError {
    fn from(e: ForecastError) -> Self {
        NavigationError::Forecast(e)
    }
}
