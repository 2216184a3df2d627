//! Simulation interface for Maze RRG
//!
//! This module defines what a planner's caller needs from a physics backend:
//! - Stepping the obstacle and the agent one tick at a time
//! - Looking up body positions by name or handle
//! - Running a full observe, plan, execute episode

mod episode;
mod kinematic;

use crate::geometry::Heading;
use nalgebra::Vector2;

pub use episode::{EpisodeOutcome, EpisodeReport, EpisodeSettings, observe_obstacle, run_episode};
pub use kinematic::KinematicMaze;

/// Bodies a backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    /// The planned-for agent
    Agent,
    /// The horizontally moving obstacle
    Obstacle,
}

impl Body {
    /// Resolves a body by its model name
    pub fn from_name(name: &str) -> Option<Body> {
        match name {
            "agent" => Some(Body::Agent),
            "obstacle" => Some(Body::Obstacle),
            _ => None,
        }
    }
}

/// Physics backend driven tick by tick
pub trait SimBackend {
    /// Places both bodies and clears any motion
    fn reset(&mut self, obstacle: Vector2<f64>, agent: Vector2<f64>);

    /// Advances one tick: the obstacle moves along x in `obstacle_direction`
    /// (-1, 0 or 1) and the agent takes one micro-step along `action`
    fn step(&mut self, obstacle_direction: f64, action: Heading);

    /// Current position of `body`
    fn body_position(&self, body: Body) -> Vector2<f64>;

    /// Position lookup by model name
    fn named_position(&self, name: &str) -> Option<Vector2<f64>> {
        Body::from_name(name).map(|body| self.body_position(body))
    }
}
