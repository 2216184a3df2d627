// src/sim/kinematic.rs
// Reference backend: point-mass agent on the micro-step grid and an obstacle
// sliding at constant speed. Walls and the map edge stop the agent in place.

use super::{Body, SimBackend};
use crate::geometry::{Heading, Zone};
use crate::MazeConfig;
use nalgebra::Vector2;

/// Kinematic stand-in for the physics engine
#[derive(Debug, Clone)]
pub struct KinematicMaze {
    agent: Vector2<f64>,
    obstacle: Vector2<f64>,
    micro_step: f64,
    obstacle_speed: f64,
    map_size: f64,
    walls: Vec<Zone>,
}

impl KinematicMaze {
    pub fn new(config: &MazeConfig) -> Self {
        KinematicMaze {
            agent: config.layout.origin.position(),
            obstacle: Vector2::new(0.0, config.layout.obstacle_lane()),
            micro_step: config.roadmap.step_resolution,
            obstacle_speed: config.obstacle.speed,
            map_size: config.roadmap.map_size,
            walls: config.layout.walls.clone(),
        }
    }

    fn admits(&self, position: &Vector2<f64>) -> bool {
        position.x.abs() <= self.map_size
            && position.y.abs() <= self.map_size
            && !self.walls.iter().any(|wall| wall.contains(position.x, position.y))
    }
}

impl SimBackend for KinematicMaze {
    fn reset(&mut self, obstacle: Vector2<f64>, agent: Vector2<f64>) {
        self.obstacle = obstacle;
        self.agent = agent;
    }

    fn step(&mut self, obstacle_direction: f64, action: Heading) {
        if obstacle_direction != 0.0 {
            self.obstacle.x += obstacle_direction.signum() * self.obstacle_speed;
        }
        if action.is_still() {
            return;
        }
        let next = self.agent + action.scaled(self.micro_step);
        if self.admits(&next) {
            self.agent = next;
        }
    }

    fn body_position(&self, body: Body) -> Vector2<f64> {
        match body {
            Body::Agent => self.agent,
            Body::Obstacle => self.obstacle,
        }
    }
}
