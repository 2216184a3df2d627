//! Obstacle trajectory forecasting for Maze RRG
//!
//! The planner treats the forecaster as an oracle: given the obstacle's
//! observed x-positions it returns a reconstruction of the observed window and
//! a fixed-length sequence of predicted future x-positions. How a forecaster
//! arrives at its prediction is its own business.

pub mod config;
pub mod kinematic;
pub mod scripted;

pub use config::ForecastConfig;
pub use kinematic::KinematicForecaster;
pub use scripted::ScriptedForecaster;

/// Output of a forecaster, in maze coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Reconstruction of the observed input window
    pub reconstructed: Vec<f64>,
    /// Predicted obstacle x-position for time indices `0..horizon`
    pub future: Vec<f64>,
}

impl Forecast {
    /// Number of predicted time indices
    pub fn horizon(&self) -> usize {
        self.future.len()
    }

    /// Predicted x-position at `time_index`, if within the horizon
    pub fn position_at(&self, time_index: usize) -> Option<f64> {
        self.future.get(time_index).copied()
    }
}

/// Trajectory oracle consumed by the forecast-aware planner
pub trait Forecaster: Send {
    /// Predicts future obstacle positions from an observed trajectory
    fn predict(&self, observed: &[f64]) -> Result<Forecast, ForecastError>;
}

/// Forecasting error types
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Fewer observations than the input window requires
    ShortTrajectory {
        /// Required observations
        needed: usize,
        /// Supplied observations
        got: usize,
    },
    /// The prediction does not cover the planner's horizon
    HorizonMismatch {
        /// Horizon the planner needs
        expected: usize,
        /// Horizon the forecaster produced
        got: usize,
    },
    /// An observation or prediction is NaN or infinite
    NonFinite(usize),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ForecastError::ShortTrajectory { needed, got } => {
                write!(f, "trajectory too short: need {} observations, got {}", needed, got)
            }
            ForecastError::HorizonMismatch { expected, got } => {
                write!(f, "forecast horizon mismatch: expected {}, got {}", expected, got)
            }
            ForecastError::NonFinite(index) => write!(f, "non-finite value at index {}", index),
        }
    }
}

impl std::error::Error for ForecastError {}

/// Checks that every value in `values` is finite
pub(crate) fn ensure_finite(values: &[f64]) -> Result<(), ForecastError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ForecastError::NonFinite(index)),
        None => Ok(()),
    }
}
