// src/navigation/collision.rs
// Time-indexed hazard checks used while validating moves inside the danger band.

use crate::ObstacleConfig;
use crate::forecast::{ensure_finite, Forecast, ForecastError};
use crate::geometry::Zone;

/// Obstacle footprint that blocked a position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardReport {
    /// Obstacle zone at `time_index`
    pub zone: Zone,
    /// Time index the position was checked at
    pub time_index: usize,
}

/// Reason a danger-band position is unusable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blockage {
    /// The time index lies past the forecast horizon
    BeyondHorizon {
        /// Offending time index
        time_index: usize,
    },
    /// The predicted obstacle covers the position
    Obstacle(HazardReport),
}

/// Collision strategy injected into the roadmap builder.
///
/// Only consulted for positions inside the danger band.
pub trait HazardCheck: Send {
    /// Number of time indices the strategy can speak for
    fn horizon(&self) -> usize;

    /// Obstacle footprint at `time_index`, if the strategy knows it
    fn obstacle_at(&self, time_index: usize) -> Option<Zone>;

    /// Whether `(x, y)` is blocked at `time_index`
    fn blocked(&self, x: f64, y: f64, time_index: usize) -> Option<Blockage> {
        if time_index >= self.horizon() {
            return Some(Blockage::BeyondHorizon { time_index });
        }
        self.obstacle_at(time_index)
            .filter(|zone| zone.contains(x, y))
            .map(|zone| Blockage::Obstacle(HazardReport { zone, time_index }))
    }
}

/// Forecast-blind check: only the horizon bound applies
#[derive(Debug, Clone, Copy)]
pub struct HorizonOnly {
    horizon: usize,
}

impl HorizonOnly {
    pub fn new(horizon: usize) -> Self {
        HorizonOnly { horizon }
    }
}

impl HazardCheck for HorizonOnly {
    fn horizon(&self) -> usize {
        self.horizon
    }

    fn obstacle_at(&self, _time_index: usize) -> Option<Zone> {
        None
    }
}

/// Forecast-aware check: a transient obstacle zone is centered on the
/// predicted x-position for each time index
#[derive(Debug, Clone)]
pub struct ForecastHazard {
    forecast: Forecast,
    horizon: usize,
    width: f64,
    thickness: f64,
    lane_y: f64,
}

impl ForecastHazard {
    /// Fails if the forecast covers fewer than `horizon` time indices or
    /// predicts a non-finite position within them
    pub fn new(
        forecast: Forecast,
        horizon: usize,
        obstacle: &ObstacleConfig,
        lane_y: f64,
    ) -> Result<Self, ForecastError> {
        if forecast.horizon() < horizon {
            return Err(ForecastError::HorizonMismatch {
                expected: horizon,
                got: forecast.horizon(),
            });
        }
        ensure_finite(&forecast.future[..horizon])?;
        Ok(ForecastHazard {
            forecast,
            horizon,
            width: obstacle.width,
            thickness: obstacle.thickness,
            lane_y,
        })
    }
}

impl HazardCheck for ForecastHazard {
    fn horizon(&self) -> usize {
        self.horizon
    }

    fn obstacle_at(&self, time_index: usize) -> Option<Zone> {
        if time_index >= self.horizon {
            return None;
        }
        self.forecast
            .position_at(time_index)
            .map(|x| Zone::new(x, self.lane_y, self.width, self.thickness))
    }
}
