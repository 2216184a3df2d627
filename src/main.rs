// src/main.rs
// Entry point for Maze RRG: observes the obstacle, plans a route through the
// maze and executes it against the kinematic backend.
//
// Usage: maze_rrg [config.yaml] [--baseline]

// Dependencies
use log::{error, info};
use maze_rrg::forecast::KinematicForecaster;
use maze_rrg::navigation::displacement;
use maze_rrg::sim::{run_episode, EpisodeSettings};
use maze_rrg::{KinematicMaze, MazeConfig, Planner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting Maze RRG...");

    let mut baseline = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--baseline" => baseline = true,
            path => config_path = Some(path.to_string()),
        }
    }

    let config = match &config_path {
        Some(path) => MazeConfig::load(path)?,
        None => {
            let config = MazeConfig::default();
            config.validate()?;
            config
        }
    };

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let x_limit = config.forecast.x_limit;
    let settings = EpisodeSettings {
        obstacle_start_x: rng.random_range(-x_limit..=x_limit),
        obstacle_direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
        ..EpisodeSettings::default()
    };
    info!(
        "Obstacle starts at x={:.2} moving {:+}",
        settings.obstacle_start_x, settings.obstacle_direction
    );

    let mut backend = KinematicMaze::new(&config);
    let planner = if baseline {
        Planner::baseline(config)
    } else {
        let forecaster = KinematicForecaster::new(config.forecast, config.obstacle.speed);
        Planner::forecast_aware(config, Box::new(forecaster))
    };
    info!("Planner: {:?}", planner.kind());

    match run_episode(&mut backend, &planner, &settings) {
        Ok(report) => {
            let policy: Vec<String> = report
                .plan
                .policy
                .iter()
                .map(|h| format!("({}, {})", h.dx, h.dy))
                .collect();
            info!("Policy: [{}]", policy.join(", "));
            let net = displacement(&report.plan.policy, planner.config().agent_step());
            info!("Net displacement: ({:.2}, {:.2})", net.x, net.y);
            info!("Outcome: {:?}", report.outcome);
            Ok(())
        }
        Err(e) => {
            error!("Episode failed: {}", e);
            Err(Box::new(e))
        }
    }
}
