// src/forecast/kinematic.rs
// Constant-speed forecaster for an obstacle that shuttles between ±x_limit.

use super::{ensure_finite, Forecast, ForecastConfig, ForecastError, Forecaster};
use log::debug;

/// Extrapolates the last observed direction of travel at a fixed speed,
/// turning around whenever the obstacle passes `±x_limit`.
///
/// The reconstruction is the observed window itself.
#[derive(Debug, Clone)]
pub struct KinematicForecaster {
    config: ForecastConfig,
    speed: f64,
}

impl KinematicForecaster {
    /// `speed` is the distance the obstacle covers per time index
    pub fn new(config: ForecastConfig, speed: f64) -> Self {
        KinematicForecaster { config, speed }
    }
}

impl Forecaster for KinematicForecaster {
    fn predict(&self, observed: &[f64]) -> Result<Forecast, ForecastError> {
        let needed = self.config.input_length.max(1);
        if observed.len() < needed {
            return Err(ForecastError::ShortTrajectory {
                needed,
                got: observed.len(),
            });
        }
        let window = &observed[..needed];
        ensure_finite(window)?;

        let direction = match window {
            [.., previous, last] if last > previous => 1.0,
            [.., previous, last] if last < previous => -1.0,
            _ => 0.0,
        };

        let limit = self.config.x_limit;
        let speed = self.speed.abs();
        let mut position = window[needed - 1];
        let mut velocity = direction * speed;
        let mut future = Vec::with_capacity(self.config.horizon);
        for _ in 0..self.config.horizon {
            if position < -limit {
                velocity = speed;
            } else if position > limit {
                velocity = -speed;
            }
            position += velocity;
            future.push(position);
        }
        debug!(
            "Kinematic forecast from x={:.2} heading {:+}: {} indices",
            window[needed - 1],
            direction,
            future.len()
        );

        Ok(Forecast {
            reconstructed: window.to_vec(),
            future,
        })
    }
}
