// tests/forecast_tests.rs
// Forecasters against the kinematic backend, and full episodes.

use maze_rrg::forecast::{ForecastError, Forecaster, KinematicForecaster};
use maze_rrg::sim::{observe_obstacle, run_episode, Body, EpisodeOutcome, EpisodeSettings};
use maze_rrg::{KinematicMaze, MazeConfig, MazeLayout, Planner, SimBackend, Waypoint, Zone};
use nalgebra::Vector2;

fn open_config() -> MazeConfig {
    let mut config = MazeConfig::default();
    config.roadmap.map_size = 4.0;
    config.layout = MazeLayout::open(Waypoint::new(0.0, -4.0), Zone::new(0.0, 4.0, 2.0, 2.0));
    config.obstacle.speed = 0.0;
    config.seed = Some(11);
    config
}

#[test]
fn kinematic_forecast_matches_simulated_obstacle() {
    let config = MazeConfig::default();
    let mut backend = KinematicMaze::new(&config);
    backend.reset(Vector2::new(5.0, 0.0), config.layout.origin.position());

    let (observed, mut direction) = observe_obstacle(
        &mut backend,
        config.forecast.input_length,
        1.0,
        config.forecast.x_limit,
    );
    let forecast = KinematicForecaster::new(config.forecast, config.obstacle.speed)
        .predict(&observed)
        .unwrap();
    assert_eq!(forecast.horizon(), config.forecast.horizon);
    assert_eq!(forecast.reconstructed, observed);

    for (t, predicted) in forecast.future.iter().enumerate() {
        let x = backend.body_position(Body::Obstacle).x;
        assert!((x - predicted).abs() < 1e-9, "t={}: simulated {} vs predicted {}", t, x, predicted);
        if x < -config.forecast.x_limit {
            direction = 1.0;
        } else if x > config.forecast.x_limit {
            direction = -1.0;
        }
        backend.step(direction, maze_rrg::Heading::STILL);
    }
}

#[test]
fn kinematic_forecast_needs_full_window() {
    let config = MazeConfig::default();
    let forecaster = KinematicForecaster::new(config.forecast, config.obstacle.speed);
    assert_eq!(
        forecaster.predict(&[0.0; 10]).unwrap_err(),
        ForecastError::ShortTrajectory { needed: 50, got: 10 }
    );
}

#[test]
fn episode_reaches_target_with_obstacle_out_of_the_way() {
    let mut config = open_config();
    config.obstacle.width = 0.5;
    config.obstacle.thickness = 0.5;
    let mut backend = KinematicMaze::new(&config);
    let planner = Planner::baseline(config);
    let settings = EpisodeSettings {
        obstacle_start_x: -9.0,
        obstacle_direction: 1.0,
        max_attempts: 1,
    };

    let report = run_episode(&mut backend, &planner, &settings).unwrap();
    assert!(report.succeeded(), "outcome: {:?}", report.outcome);
    assert_eq!(report.attempts, 1);
    assert_eq!(report.observed, vec![-9.0; 50]);
    assert_eq!(
        report.outcome,
        EpisodeOutcome::Reached {
            ticks: report.plan.policy.len() * 10
        }
    );
}

#[test]
fn episode_reports_collision_with_parked_obstacle() {
    let mut config = open_config();
    config.obstacle.width = 6.0;
    config.obstacle.thickness = 1.0;
    let mut backend = KinematicMaze::new(&config);
    let planner = Planner::baseline(config);
    let settings = EpisodeSettings {
        obstacle_start_x: 0.0,
        obstacle_direction: 1.0,
        max_attempts: 1,
    };

    let report = run_episode(&mut backend, &planner, &settings).unwrap();
    match report.outcome {
        EpisodeOutcome::Collided { agent, .. } => {
            assert!(agent.y.abs() < 0.5);
            assert!(agent.x.abs() < 3.0);
        }
        other => panic!("expected a collision, got {:?}", other),
    }
}
