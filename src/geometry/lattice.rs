// src/geometry/lattice.rs
// Waypoints, their lattice identity, and discrete headings.

// Dependencies
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in continuous maze coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    /// Creates a waypoint at `(x, y)`
    pub fn new(x: f64, y: f64) -> Self {
        Waypoint { x, y }
    }

    /// Position as a column vector
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Waypoint {
    fn from(v: Vector2<f64>) -> Self {
        Waypoint { x: v.x, y: v.y }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Identity of a roadmap node: integer micro-step offsets from the origin.
///
/// Two nodes are the same iff their cells are equal, so accumulated
/// floating-point error can never produce a near-duplicate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub ix: i64,
    pub iy: i64,
}

impl Cell {
    /// Lattice origin
    pub const ORIGIN: Cell = Cell { ix: 0, iy: 0 };

    pub fn new(ix: i64, iy: i64) -> Self {
        Cell { ix, iy }
    }

    /// Cell reached by moving `steps` micro-steps along `heading`
    pub fn offset(self, heading: Heading, steps: i64) -> Cell {
        Cell {
            ix: self.ix + heading.dx as i64 * steps,
            iy: self.iy + heading.dy as i64 * steps,
        }
    }
}

/// Maps cells to continuous coordinates around a fixed origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    origin: Waypoint,
    resolution: f64,
}

impl Lattice {
    /// Creates a lattice anchored at `origin` with spacing `resolution`
    pub fn new(origin: Waypoint, resolution: f64) -> Self {
        Lattice { origin, resolution }
    }

    /// Continuous coordinates of `cell`
    pub fn waypoint(&self, cell: Cell) -> Waypoint {
        Waypoint {
            x: self.origin.x + cell.ix as f64 * self.resolution,
            y: self.origin.y + cell.iy as f64 * self.resolution,
        }
    }
}

/// Discrete per-axis command, each component in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    pub dx: i8,
    pub dy: i8,
}

impl Heading {
    /// No motion
    pub const STILL: Heading = Heading { dx: 0, dy: 0 };

    pub fn new(dx: i8, dy: i8) -> Self {
        Heading {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }

    /// Heading from `from` toward `(to_x, to_y)`.
    ///
    /// Each axis moves only when the coordinate gap exceeds `threshold`;
    /// the axes are decided independently.
    pub fn toward(from: Waypoint, to_x: f64, to_y: f64, threshold: f64) -> Heading {
        Heading {
            dx: thresholded_sign(to_x - from.x, threshold),
            dy: thresholded_sign(to_y - from.y, threshold),
        }
    }

    /// Plain sign of the displacement from `from` to `to` (zero stays zero)
    pub fn between(from: Waypoint, to: Waypoint) -> Heading {
        Heading {
            dx: thresholded_sign(to.x - from.x, 0.0),
            dy: thresholded_sign(to.y - from.y, 0.0),
        }
    }

    pub fn is_still(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Heading as a vector scaled by `length`
    pub fn scaled(&self, length: f64) -> Vector2<f64> {
        Vector2::new(self.dx as f64 * length, self.dy as f64 * length)
    }
}

fn thresholded_sign(delta: f64, threshold: f64) -> i8 {
    if delta.abs() <= threshold {
        0
    } else if delta > 0.0 {
        1
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0, 3.0, 0.5, Heading { dx: 1, dy: 0 })]
    #[case(0.0, 0.0, -1.5, -1.5, Heading { dx: -1, dy: -1 })]
    #[case(0.0, 0.0, 1.0, -1.0, Heading { dx: 0, dy: 0 })]
    #[case(2.0, -11.0, 0.5, -8.0, Heading { dx: -1, dy: 1 })]
    fn heading_uses_threshold_per_axis(
        #[case] fx: f64,
        #[case] fy: f64,
        #[case] tx: f64,
        #[case] ty: f64,
        #[case] expected: Heading,
    ) {
        assert_eq!(Heading::toward(Waypoint::new(fx, fy), tx, ty, 1.0), expected);
    }

    #[test]
    fn between_is_plain_sign() {
        let a = Waypoint::new(0.0, 0.0);
        assert_eq!(Heading::between(a, Waypoint::new(0.1, 0.0)), Heading::new(1, 0));
        assert_eq!(Heading::between(a, Waypoint::new(0.0, -2.5)), Heading::new(0, -1));
        assert_eq!(Heading::between(a, a), Heading::STILL);
    }

    #[test]
    fn lattice_coordinates_are_exact_multiples() {
        let lattice = Lattice::new(Waypoint::new(2.0, -11.0), 0.25);
        let cell = Cell::ORIGIN
            .offset(Heading::new(-1, 1), 10)
            .offset(Heading::new(-1, 1), 10)
            .offset(Heading::new(0, 1), 10);
        assert_eq!(cell, Cell::new(-20, 30));
        assert_eq!(lattice.waypoint(cell), Waypoint::new(-3.0, -3.5));
    }
}
