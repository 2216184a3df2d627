// src/navigation/planner.rs
// Orchestrates roadmap growth, route extraction and policy synthesis for the
// forecast-aware and forecast-blind (baseline) planners.

// Dependencies
use super::collision::{ForecastHazard, HazardCheck, HorizonOnly};
use super::controller::synthesize;
use super::roadmap::{Roadmap, RoadmapBuilder};
use super::NavigationError;
use crate::forecast::Forecaster;
use crate::geometry::{Cell, Heading, MazeLayout, Waypoint};
use crate::MazeConfig;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Which collision strategy a planner uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerKind {
    /// Checks moves against the forecast obstacle and re-audits the route
    ForecastAware,
    /// Only enforces the forecast horizon inside the danger band
    Baseline,
}

/// Limits on the growth loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanBudget {
    /// Maximum samples drawn
    pub max_iterations: Option<u64>,
    /// Wall-clock limit
    pub time_limit: Option<Duration>,
}

impl PlanBudget {
    /// No limits: growth blocks until the target is reached
    pub fn unbounded() -> Self {
        PlanBudget::default()
    }

    pub fn iterations(max_iterations: u64) -> Self {
        PlanBudget {
            max_iterations: Some(max_iterations),
            time_limit: None,
        }
    }

    /// True once either limit has been reached
    pub fn is_exhausted(&self, iterations: u64, elapsed: Duration) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
            || self.time_limit.is_some_and(|limit| elapsed >= limit)
    }
}

impl From<crate::BudgetConfig> for PlanBudget {
    fn from(config: crate::BudgetConfig) -> Self {
        PlanBudget {
            max_iterations: config.max_iterations,
            time_limit: config.time_limit_ms.map(Duration::from_millis),
        }
    }
}

/// Cooperative cancellation flag shared with a running planner
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A route and the policy that drives it
#[derive(Debug, Clone)]
pub struct Plan {
    /// Waypoints from the origin to the goal
    pub path: Vec<Waypoint>,
    /// One command per path edge
    pub policy: Vec<Heading>,
    /// Samples drawn while growing the roadmap
    pub iterations: u64,
    /// The grown roadmap, kept for inspection and plotting
    pub roadmap: Roadmap,
}

/// Roadmap planner. Both variants share the builder and differ only in the
/// hazard check they inject and the final route audit.
pub struct Planner {
    config: MazeConfig,
    forecaster: Option<Box<dyn Forecaster>>,
    budget: PlanBudget,
}

impl Planner {
    /// Planner that avoids the obstacle positions predicted by `forecaster`
    pub fn forecast_aware(config: MazeConfig, forecaster: Box<dyn Forecaster>) -> Self {
        let budget = PlanBudget::from(config.budget);
        Planner {
            config,
            forecaster: Some(forecaster),
            budget,
        }
    }

    /// Planner that ignores the obstacle's position
    pub fn baseline(config: MazeConfig) -> Self {
        let budget = PlanBudget::from(config.budget);
        Planner {
            config,
            forecaster: None,
            budget,
        }
    }

    /// Replaces the budget taken from the configuration
    pub fn with_budget(mut self, budget: PlanBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn kind(&self) -> PlannerKind {
        match self.forecaster {
            Some(_) => PlannerKind::ForecastAware,
            None => PlannerKind::Baseline,
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn budget(&self) -> &PlanBudget {
        &self.budget
    }

    /// Plans with the configured seed, or a random one if none is set
    pub fn plan(&self, observed: &[f64]) -> Result<Plan, NavigationError> {
        self.plan_seeded(observed, self.seed())
    }

    /// Plans with an explicit sampling seed
    pub fn plan_seeded(&self, observed: &[f64], seed: u64) -> Result<Plan, NavigationError> {
        self.plan_with_cancel(observed, seed, &CancelToken::new())
    }

    /// Plans until the goal is found, the budget is spent or `cancel` fires
    pub fn plan_with_cancel(
        &self,
        observed: &[f64],
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<Plan, NavigationError> {
        let hazard = self.hazard(observed)?;
        let mut builder = RoadmapBuilder::new(
            self.config.roadmap,
            self.config.layout.clone(),
            hazard,
            seed,
        )?;
        let goal = match builder.grow(&self.budget, cancel) {
            Ok(goal) => goal,
            Err(e) => {
                if let Some(report) = builder.last_hazard() {
                    let (x, y) = report.zone.center();
                    warn!(
                        "Last obstacle blockage: footprint at ({:.2}, {:.2}), t={}",
                        x, y, report.time_index
                    );
                }
                return Err(e);
            }
        };

        let roadmap = builder.roadmap();
        let cells = roadmap.path_to(goal).ok_or_else(|| {
            NavigationError::InvalidPath("goal is not reachable from the origin".to_string())
        })?;

        if self.kind() == PlannerKind::ForecastAware {
            audit_path(
                roadmap,
                &cells,
                builder.layout(),
                builder.hazard(),
                self.config.roadmap.step_size,
            )?;
        }

        let path: Vec<Waypoint> = cells.iter().map(|&cell| roadmap.waypoint(cell)).collect();
        let policy = synthesize(&path);
        info!(
            "{:?} plan: {} waypoints, {} samples, {} roadmap nodes",
            self.kind(),
            path.len(),
            builder.iterations(),
            roadmap.len()
        );

        let iterations = builder.iterations();
        Ok(Plan {
            path,
            policy,
            iterations,
            roadmap: builder.into_roadmap(),
        })
    }

    /// Runs the planner on a background thread
    pub fn spawn(self, observed: Vec<f64>) -> PlanHandle {
        let seed = self.seed();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let worker = std::thread::spawn(move || self.plan_with_cancel(&observed, seed, &token));
        PlanHandle { cancel, worker }
    }

    fn hazard(&self, observed: &[f64]) -> Result<Box<dyn HazardCheck>, NavigationError> {
        let horizon = self.config.forecast.horizon;
        match &self.forecaster {
            Some(forecaster) => {
                let forecast = forecaster.predict(observed)?;
                let hazard = ForecastHazard::new(
                    forecast,
                    horizon,
                    &self.config.obstacle,
                    self.config.layout.obstacle_lane(),
                )?;
                Ok(Box::new(hazard))
            }
            None => Ok(Box::new(HorizonOnly::new(horizon))),
        }
    }

    fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }
}

/// Handle to a planner running on a background thread
pub struct PlanHandle {
    cancel: CancelToken,
    worker: JoinHandle<Result<Plan, NavigationError>>,
}

impl PlanHandle {
    /// True once the worker has produced a result
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Asks the worker to stop at its next iteration
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Blocks until the worker finishes
    pub fn join(self) -> Result<Plan, NavigationError> {
        self.worker
            .join()
            .map_err(|_| NavigationError::WorkerPanicked)?
    }
}

/// Re-checks every danger-band waypoint of a finished route against the
/// hazard at the time index the route reaches it, `hops · step_size`.
pub fn audit_path(
    roadmap: &Roadmap,
    path: &[Cell],
    layout: &MazeLayout,
    hazard: &dyn HazardCheck,
    step_size: usize,
) -> Result<(), NavigationError> {
    for pair in path.windows(2) {
        if !roadmap.is_linked(pair[0], pair[1]) {
            return Err(NavigationError::InvalidPath(format!(
                "{} and {} are not adjacent",
                roadmap.waypoint(pair[0]),
                roadmap.waypoint(pair[1])
            )));
        }
    }

    for &cell in path {
        let waypoint = roadmap.waypoint(cell);
        if !layout.in_danger_band(waypoint.x, waypoint.y) {
            continue;
        }
        let hops = roadmap.hops(cell).ok_or_else(|| {
            NavigationError::InvalidPath(format!("{} is not in the roadmap", waypoint))
        })?;
        let time_index = hops * step_size;
        if let Some(blockage) = hazard.blocked(waypoint.x, waypoint.y, time_index) {
            warn!(
                "Route waypoint {} blocked at t={}: {:?}",
                waypoint, time_index, blockage
            );
            return Err(NavigationError::Collision {
                waypoint,
                time_index,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{Forecast, ScriptedForecaster};
    use crate::geometry::{Lattice, Zone};
    use crate::ObstacleConfig;

    fn corridor_roadmap() -> Roadmap {
        let mut roadmap = Roadmap::new(Lattice::new(Waypoint::new(0.0, -5.0), 0.25));
        roadmap.insert(Cell::new(0, 10), Cell::ORIGIN);
        roadmap.insert(Cell::new(0, 20), Cell::new(0, 10));
        roadmap
    }

    fn band_layout() -> MazeLayout {
        let mut layout =
            MazeLayout::open(Waypoint::new(0.0, -5.0), Zone::new(0.0, 5.0, 2.0, 2.0));
        layout.danger_band = Some(Zone::new(0.0, 0.0, 14.0, 4.0));
        layout
    }

    fn hazard_at(x: f64) -> ForecastHazard {
        let obstacle = ObstacleConfig {
            width: 2.0,
            thickness: 4.0,
            speed: 0.25,
        };
        let forecast = Forecast {
            reconstructed: Vec::new(),
            future: vec![x; 100],
        };
        ForecastHazard::new(forecast, 100, &obstacle, 0.0).unwrap()
    }

    #[test]
    fn audit_flags_waypoint_under_obstacle() {
        let roadmap = corridor_roadmap();
        let path = roadmap.path_to(Cell::new(0, 20)).unwrap();
        let err = audit_path(&roadmap, &path, &band_layout(), &hazard_at(0.0), 10).unwrap_err();
        assert_eq!(
            err,
            NavigationError::Collision {
                waypoint: Waypoint::new(0.0, 0.0),
                time_index: 20,
            }
        );
    }

    #[test]
    fn audit_passes_when_obstacle_is_elsewhere() {
        let roadmap = corridor_roadmap();
        let path = roadmap.path_to(Cell::new(0, 20)).unwrap();
        assert!(audit_path(&roadmap, &path, &band_layout(), &hazard_at(5.0), 10).is_ok());
    }

    #[test]
    fn audit_rejects_disconnected_route() {
        let roadmap = corridor_roadmap();
        let path = vec![Cell::ORIGIN, Cell::new(0, 20)];
        assert!(matches!(
            audit_path(&roadmap, &path, &band_layout(), &hazard_at(5.0), 10),
            Err(NavigationError::InvalidPath(_))
        ));
    }

    #[test]
    fn budget_limits_iterations_and_time() {
        let budget = PlanBudget {
            max_iterations: Some(10),
            time_limit: Some(Duration::from_millis(50)),
        };
        assert!(!budget.is_exhausted(9, Duration::from_millis(10)));
        assert!(budget.is_exhausted(10, Duration::from_millis(10)));
        assert!(budget.is_exhausted(0, Duration::from_millis(50)));
        assert!(!PlanBudget::unbounded().is_exhausted(u64::MAX, Duration::MAX));
    }

    #[test]
    fn cancelled_planner_stops() {
        let mut config = MazeConfig::default();
        config.seed = Some(3);
        let planner = Planner::forecast_aware(config, Box::new(ScriptedForecaster::constant(0.0, 100)))
            .with_budget(PlanBudget::unbounded());
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = planner.plan_with_cancel(&[0.0; 50], 3, &cancel).unwrap_err();
        assert_eq!(err, NavigationError::Cancelled { iterations: 0 });
    }

    #[test]
    fn short_forecast_is_reported() {
        let planner = Planner::forecast_aware(
            MazeConfig::default(),
            Box::new(ScriptedForecaster::constant(0.0, 10)),
        );
        assert!(matches!(
            planner.plan_seeded(&[0.0; 50], 1),
            Err(NavigationError::Forecast(_))
        ));
    }
}
