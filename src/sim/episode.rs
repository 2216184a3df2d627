// src/sim/episode.rs
// Observe the obstacle, plan a route, then drive the agent along the policy
// while the obstacle keeps moving.

// Dependencies
use super::{Body, SimBackend};
use crate::geometry::{Waypoint, Zone};
use crate::navigation::{NavigationError, Plan, Planner, PolicyController};
use crate::{MazeConfig, MazeError};
use log::{info, warn};
use nalgebra::Vector2;

/// Initial conditions of an episode
#[derive(Debug, Clone, Copy)]
pub struct EpisodeSettings {
    /// Obstacle x-position at reset
    pub obstacle_start_x: f64,
    /// Initial obstacle direction, -1 or 1
    pub obstacle_direction: f64,
    /// Planning attempts before giving up
    pub max_attempts: usize,
}

impl Default for EpisodeSettings {
    fn default() -> Self {
        EpisodeSettings {
            obstacle_start_x: 0.0,
            obstacle_direction: 1.0,
            max_attempts: 5,
        }
    }
}

/// How an executed policy ended
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeOutcome {
    /// The agent finished a macro-step inside the target
    Reached {
        /// Ticks executed
        ticks: usize,
    },
    /// Every command was issued without reaching the target
    PolicyExhausted {
        /// Ticks executed
        ticks: usize,
    },
    /// The obstacle caught the agent
    Collided {
        /// Ticks executed
        ticks: usize,
        /// Agent position at impact
        agent: Waypoint,
    },
}

/// Summary of one episode
#[derive(Debug, Clone)]
pub struct EpisodeReport {
    /// How execution ended
    pub outcome: EpisodeOutcome,
    /// Planning attempts used
    pub attempts: usize,
    /// The executed plan
    pub plan: Plan,
    /// Obstacle x-positions handed to the planner
    pub observed: Vec<f64>,
}

impl EpisodeReport {
    /// True when the agent reached the target
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, EpisodeOutcome::Reached { .. })
    }
}

/// Direction the obstacle takes from `x`: it turns around past `±x_limit`
fn bounce(x: f64, direction: f64, x_limit: f64) -> f64 {
    if x < -x_limit {
        1.0
    } else if x > x_limit {
        -1.0
    } else {
        direction
    }
}

/// Steps the backend `ticks` times with the agent idle, recording the
/// obstacle's x-position before each tick. Returns the observations and the
/// obstacle's direction afterwards.
pub fn observe_obstacle<B: SimBackend>(
    backend: &mut B,
    ticks: usize,
    mut direction: f64,
    x_limit: f64,
) -> (Vec<f64>, f64) {
    let mut observed = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        let x = backend.body_position(Body::Obstacle).x;
        observed.push(x);
        direction = bounce(x, direction, x_limit);
        backend.step(direction, crate::geometry::Heading::STILL);
    }
    (observed, direction)
}

/// Runs one observe, plan, execute episode.
///
/// Planning is retried with a fresh seed up to `settings.max_attempts`
/// times; if every attempt fails the last planning error is returned.
pub fn run_episode<B: SimBackend>(
    backend: &mut B,
    planner: &Planner,
    settings: &EpisodeSettings,
) -> Result<EpisodeReport, MazeError> {
    let config: &MazeConfig = planner.config();
    let lane = config.layout.obstacle_lane();
    backend.reset(
        Vector2::new(settings.obstacle_start_x, lane),
        config.layout.origin.position(),
    );

    let (observed, mut direction) = observe_obstacle(
        backend,
        config.forecast.input_length,
        settings.obstacle_direction,
        config.forecast.x_limit,
    );

    let (plan, attempts) = plan_with_retries(planner, &observed, settings.max_attempts.max(1))?;
    info!(
        "Executing {} macro-steps after {} planning attempt(s)",
        plan.policy.len(),
        attempts
    );

    let step_size = config.roadmap.step_size;
    let mut controller = PolicyController::new(plan.policy.clone(), step_size);
    let outcome = loop {
        let agent = backend.body_position(Body::Agent);
        let obstacle = backend.body_position(Body::Obstacle);
        let footprint = Zone::new(
            obstacle.x,
            obstacle.y,
            config.obstacle.width,
            config.obstacle.thickness,
        );
        if footprint.contains(agent.x, agent.y) {
            break EpisodeOutcome::Collided {
                ticks: controller.ticks(),
                agent: Waypoint::from(agent),
            };
        }
        if controller.at_step_boundary() && config.layout.target.contains(agent.x, agent.y) {
            break EpisodeOutcome::Reached {
                ticks: controller.ticks(),
            };
        }
        let Some(command) = controller.next_command() else {
            break EpisodeOutcome::PolicyExhausted {
                ticks: controller.ticks(),
            };
        };
        direction = bounce(obstacle.x, direction, config.forecast.x_limit);
        backend.step(direction, command);
    };

    match &outcome {
        EpisodeOutcome::Reached { ticks } => info!("Target reached after {} ticks", ticks),
        other => warn!(
            "Episode failed after {} macro-steps: {:?}",
            controller.completed_steps(),
            other
        ),
    }

    Ok(EpisodeReport {
        outcome,
        attempts,
        plan,
        observed,
    })
}

fn plan_with_retries(
    planner: &Planner,
    observed: &[f64],
    max_attempts: usize,
) -> Result<(Plan, usize), MazeError> {
    let mut last_error = NavigationError::NoPath { iterations: 0 };
    for attempt in 0..max_attempts {
        let seed = planner
            .config()
            .seed
            .map(|seed| seed.wrapping_add(attempt as u64))
            .unwrap_or_else(rand::random);
        match planner.plan_seeded(observed, seed) {
            Ok(plan) => return Ok((plan, attempt + 1)),
            Err(e @ NavigationError::Cancelled { .. }) => return Err(e.into()),
            Err(e) => {
                warn!("Planning attempt {} failed: {}", attempt + 1, e);
                last_error = e;
            }
        }
    }
    Err(last_error.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Heading;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Backend {}
        impl SimBackend for Backend {
            fn reset(&mut self, obstacle: Vector2<f64>, agent: Vector2<f64>);
            fn step(&mut self, obstacle_direction: f64, action: Heading);
            fn body_position(&self, body: Body) -> Vector2<f64>;
        }
    }

    #[test]
    fn bounce_turns_past_limits() {
        assert_eq!(bounce(-10.5, -1.0, 10.0), 1.0);
        assert_eq!(bounce(10.5, 1.0, 10.0), -1.0);
        assert_eq!(bounce(10.0, 1.0, 10.0), 1.0);
    }

    #[test]
    fn observation_records_pre_step_positions() {
        let mut backend = MockBackend::new();
        backend
            .expect_body_position()
            .with(eq(Body::Obstacle))
            .times(3)
            .returning({
                let mut xs = vec![10.5, 10.25, 10.0].into_iter();
                move |_| Vector2::new(xs.next().unwrap_or(0.0), 0.0)
            });
        backend
            .expect_step()
            .withf(|direction, action| *direction == -1.0 && action.is_still())
            .times(3)
            .return_const(());

        let (observed, direction) = observe_obstacle(&mut backend, 3, 1.0, 10.0);
        assert_eq!(observed, vec![10.5, 10.25, 10.0]);
        assert_eq!(direction, -1.0);
    }
}
