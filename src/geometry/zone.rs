// src/geometry/zone.rs
// Axis-aligned rectangular zones used for walls, the target, the danger band
// and the transient obstacle footprint.

use serde::{Deserialize, Serialize};

/// Rectangle given by its center and full extents.
///
/// Membership is boundary-exclusive: a point on an edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    center_x: f64,
    center_y: f64,
    width_x: f64,
    width_y: f64,
}

impl Zone {
    /// Creates a zone centered at `(center_x, center_y)` spanning `width_x` by `width_y`
    pub fn new(center_x: f64, center_y: f64, width_x: f64, width_y: f64) -> Self {
        Zone {
            center_x,
            center_y,
            width_x,
            width_y,
        }
    }

    /// Center of the zone
    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn min_x(&self) -> f64 {
        self.center_x - self.width_x / 2.0
    }

    pub fn max_x(&self) -> f64 {
        self.center_x + self.width_x / 2.0
    }

    pub fn min_y(&self) -> f64 {
        self.center_y - self.width_y / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.center_y + self.width_y / 2.0
    }

    /// True iff `min_x < x < max_x` and `min_y < y < max_y`
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min_x() < x && x < self.max_x() && self.min_y() < y && y < self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn bounds_follow_center_and_widths() {
        let zone = Zone::new(-8.0, 7.5, 12.0, 5.0);
        assert_eq!(zone.min_x(), -14.0);
        assert_eq!(zone.max_x(), -2.0);
        assert_eq!(zone.min_y(), 5.0);
        assert_eq!(zone.max_y(), 10.0);
    }

    #[rstest]
    #[case(0.0, 0.0, true)]
    #[case(0.99, -0.99, true)]
    #[case(1.0, 0.0, false)]
    #[case(0.0, -1.0, false)]
    #[case(-1.0, 1.0, false)]
    #[case(2.0, 0.0, false)]
    fn membership_excludes_boundary(#[case] x: f64, #[case] y: f64, #[case] inside: bool) {
        let zone = Zone::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(zone.contains(x, y), inside);
    }
}
