// src/forecast/config.rs
// Window and horizon parameters shared by forecasters and the planner.

use serde::{Deserialize, Serialize};

/// Forecaster configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Observations consumed per prediction
    pub input_length: usize,
    /// Predicted time indices (H)
    pub horizon: usize,
    /// The obstacle turns around once it passes `±x_limit`
    pub x_limit: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            input_length: 50,
            horizon: 100,
            x_limit: 10.0,
        }
    }
}
