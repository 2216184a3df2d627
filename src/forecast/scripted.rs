// src/forecast/scripted.rs
// Replays a fixed prediction regardless of the observed trajectory.

use super::{ensure_finite, Forecast, ForecastError, Forecaster};

/// Forecaster that always predicts the same future.
///
/// Useful for replaying a recorded prediction and for pinning the obstacle
/// in place when exercising the planner.
#[derive(Debug, Clone)]
pub struct ScriptedForecaster {
    future: Vec<f64>,
}

impl ScriptedForecaster {
    pub fn new(future: Vec<f64>) -> Self {
        ScriptedForecaster { future }
    }

    /// Obstacle parked at `x` for `horizon` time indices
    pub fn constant(x: f64, horizon: usize) -> Self {
        ScriptedForecaster {
            future: vec![x; horizon],
        }
    }
}

impl Forecaster for ScriptedForecaster {
    fn predict(&self, observed: &[f64]) -> Result<Forecast, ForecastError> {
        ensure_finite(&self.future)?;
        Ok(Forecast {
            reconstructed: observed.to_vec(),
            future: self.future.clone(),
        })
    }
}
