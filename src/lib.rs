//! Maze RRG - time-aware roadmap planning for a maze with a moving obstacle
//!
//! This library grows a random geometric graph (RRG) over the free space of a
//! bounded 2-D maze, checks every edge against a horizontally moving obstacle
//! whose future positions come from a forecaster, extracts the fewest-edge
//! route to the target and turns it into a discrete control policy.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod geometry;
pub mod forecast;
pub mod navigation;
pub mod sim;

// Re-export commonly used items for easier access
pub use geometry::{Cell, Heading, Lattice, MazeLayout, Waypoint, Zone};
pub use forecast::{Forecast, ForecastConfig, ForecastError, Forecaster};
pub use navigation::{
    CancelToken, NavigationError, Plan, PlanBudget, PlanHandle, Planner, PlannerKind,
    RoadmapConfig,
};
pub use sim::{EpisodeOutcome, EpisodeReport, EpisodeSettings, KinematicMaze, SimBackend};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Main configuration structure for a planning session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Roadmap growth parameters
    pub roadmap: RoadmapConfig,
    /// Moving obstacle geometry and speed
    pub obstacle: ObstacleConfig,
    /// Forecaster window and horizon
    pub forecast: ForecastConfig,
    /// Static zones and origin
    pub layout: MazeLayout,
    /// Growth loop budget
    pub budget: BudgetConfig,
    /// Seed for the sampling RNG; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Moving obstacle geometry
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub thickness: f64,
    /// Distance travelled per simulation tick
    pub speed: f64,
}

/// Budget imposed on the otherwise unbounded growth loop
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Maximum number of samples drawn
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Wall-clock limit in milliseconds
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        let roadmap = RoadmapConfig::default();
        MazeConfig {
            layout: MazeLayout::reference(roadmap.map_size),
            roadmap,
            obstacle: ObstacleConfig {
                width: 10.0,
                thickness: 5.0,
                speed: 0.25,
            },
            forecast: ForecastConfig::default(),
            budget: BudgetConfig {
                max_iterations: Some(500_000),
                time_limit_ms: Some(30_000),
            },
            seed: None,
        }
    }
}

impl MazeConfig {
    /// Loads a configuration from a YAML file and validates it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MazeError> {
        let file = File::open(path.as_ref())?;
        let config: MazeConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        log::info!("Loaded maze configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Rejects parameter combinations the planner cannot work with
    pub fn validate(&self) -> Result<(), MazeError> {
        self.roadmap
            .validate()
            .map_err(|e| MazeError::Config(e.to_string()))?;
        let roadmap = &self.roadmap;
        if self.forecast.horizon == 0 {
            return Err(MazeError::Config("forecast horizon must be at least 1".to_string()));
        }
        if !self.forecast.x_limit.is_finite() || self.forecast.x_limit <= 0.0 {
            return Err(MazeError::Config(format!(
                "forecast x_limit must be finite and positive, got {}",
                self.forecast.x_limit
            )));
        }
        let obstacle = &self.obstacle;
        if !is_positive(obstacle.width) || !is_positive(obstacle.thickness) {
            return Err(MazeError::Config(format!(
                "obstacle extents must be finite and positive, got {} x {}",
                obstacle.width, obstacle.thickness
            )));
        }
        if !obstacle.speed.is_finite() || obstacle.speed < 0.0 {
            return Err(MazeError::Config(format!(
                "obstacle speed must be finite and non-negative, got {}",
                obstacle.speed
            )));
        }
        let origin = self.layout.origin;
        if origin.x.abs() > roadmap.map_size || origin.y.abs() > roadmap.map_size {
            return Err(MazeError::Config(format!(
                "origin ({}, {}) lies outside the map",
                origin.x, origin.y
            )));
        }
        Ok(())
    }

    /// Length of one macro-step (one roadmap edge)
    pub fn agent_step(&self) -> f64 {
        self.roadmap.agent_step()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Maze RRG error types
#[derive(Debug)]
pub enum MazeError {
    /// Configuration error
    Config(String),
    /// File access error
    Io(std::io::Error),
    /// YAML parsing error
    Yaml(serde_yaml::Error),
    /// Planning error
    Navigation(NavigationError),
}

impl std::fmt::Display for MazeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MazeError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MazeError::Io(e) => write!(f, "I/O error: {}", e),
            MazeError::Yaml(e) => write!(f, "YAML error: {}", e),
            MazeError::Navigation(e) => write!(f, "Navigation error: {}", e),
        }
    }
}

impl std::error::Error for MazeError {}

impl From<std::io::Error> for MazeError {
    fn from(e: std::io::Error) -> Self {
        MazeError::Io(e)
    }
}

impl From<serde_yaml::Error> for MazeError {
    fn from(e: serde_yaml::Error) -> Self {
        MazeError::Yaml(e)
    }
}

impl From<NavigationError> for MazeError {
    fn from(e: NavigationError) -> Self {
        MazeError::Navigation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_config_is_valid() {
        let config = MazeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.agent_step(), 2.5);
    }

    #[test]
    fn rejects_zero_step_size() {
        let mut config = MazeConfig::default();
        config.roadmap.step_size = 0;
        assert!(matches!(config.validate(), Err(MazeError::Config(_))));
    }

    #[rstest]
    #[case::zero_x_limit(|c: &mut MazeConfig| c.forecast.x_limit = 0.0)]
    #[case::nan_x_limit(|c: &mut MazeConfig| c.forecast.x_limit = f64::NAN)]
    #[case::nan_width(|c: &mut MazeConfig| c.obstacle.width = f64::NAN)]
    #[case::infinite_thickness(|c: &mut MazeConfig| c.obstacle.thickness = f64::INFINITY)]
    #[case::negative_speed(|c: &mut MazeConfig| c.obstacle.speed = -0.25)]
    #[case::nan_speed(|c: &mut MazeConfig| c.obstacle.speed = f64::NAN)]
    fn rejects_unusable_obstacle_parameters(#[case] corrupt: fn(&mut MazeConfig)) {
        let mut config = MazeConfig::default();
        corrupt(&mut config);
        assert!(matches!(config.validate(), Err(MazeError::Config(_))));
    }

    #[test]
    fn parked_obstacle_is_allowed() {
        let mut config = MazeConfig::default();
        config.obstacle.speed = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_origin_outside_map() {
        let mut config = MazeConfig::default();
        config.layout.origin = Waypoint::new(0.0, 13.0);
        assert!(matches!(config.validate(), Err(MazeError::Config(_))));
    }

    #[test]
    fn yaml_round_trip_keeps_layout() {
        let config = MazeConfig::default();
        let text = serde_yaml::to_string(&config).unwrap();
        let parsed: MazeConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.layout.walls.len(), 2);
        assert_eq!(parsed.layout.origin, config.layout.origin);
        assert_eq!(parsed.forecast.horizon, 100);
    }
}
