// src/geometry/maze.rs
// Static layout of a planning session: walls, target, danger band and origin.

use super::{Waypoint, Zone};
use serde::{Deserialize, Serialize};

/// Fixed zones of a maze. Immutable for the duration of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeLayout {
    /// Static walls the agent may never enter
    #[serde(default)]
    pub walls: Vec<Zone>,
    /// Goal region
    pub target: Zone,
    /// Horizontal strip the moving obstacle sweeps through
    #[serde(default)]
    pub danger_band: Option<Zone>,
    /// Start of every route
    pub origin: Waypoint,
}

impl MazeLayout {
    /// The reference maze: two staggered walls, a target in the upper-left
    /// corner and a danger band across the middle of the map.
    pub fn reference(map_size: f64) -> Self {
        MazeLayout {
            walls: vec![
                Zone::new(-8.0, 7.5, 12.0, 5.0),
                Zone::new(8.0, -7.5, 12.0, 5.0),
            ],
            target: Zone::new(-8.0, 11.0, 8.0, 2.0),
            danger_band: Some(Zone::new(0.0, 0.0, map_size * 2.0 + 4.0, 5.0)),
            origin: Waypoint::new(2.0, -11.0),
        }
    }

    /// A layout with no walls and no danger band
    pub fn open(origin: Waypoint, target: Zone) -> Self {
        MazeLayout {
            walls: Vec::new(),
            target,
            danger_band: None,
            origin,
        }
    }

    /// True if `(x, y)` lies inside any wall
    pub fn hits_wall(&self, x: f64, y: f64) -> bool {
        self.walls.iter().any(|wall| wall.contains(x, y))
    }

    /// True if `(x, y)` lies inside the danger band
    pub fn in_danger_band(&self, x: f64, y: f64) -> bool {
        self.danger_band.is_some_and(|band| band.contains(x, y))
    }

    /// Y coordinate the obstacle travels along
    pub fn obstacle_lane(&self) -> f64 {
        self.danger_band.map(|band| band.center().1).unwrap_or(0.0)
    }
}
