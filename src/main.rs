//! Headless demo: drives the simulation with a simple autopilot at a fixed
//! 60 Hz timestep and prints the outcome. Useful for eyeballing the spawner
//! and difficulty curve via RUST_LOG=debug.

use std::path::PathBuf;

use shape_dash::consts::FRAME_DT;
use shape_dash::sim::{tick, CircleContact, TickInput, VerticalBand};
use shape_dash::tuning::GameMode;
use shape_dash::{BestRun, GameState, HighScores};

/// How far ahead (in seconds of travel) the autopilot reacts to an obstacle
const REACT_HORIZON: f32 = 0.38;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xD1CE_F00D);
    let max_seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    log::info!("starting autopilot run, seed {seed:#x}, cap {max_seconds}s");

    let mut state = GameState::new(seed, GameMode::Classic);
    let oracle = CircleContact;
    let mut raw_time = 0.0f64;
    let mut was_grounded = true;

    loop {
        let (began, active) = autopilot(&state, was_grounded);
        was_grounded = state.player.vertical_velocity == 0.0;

        let input = TickInput {
            raw_time,
            touches_began: began,
            active_touches: active,
        };
        let result = tick(&mut state, &input, &oracle);

        if let Some(record) = state.take_run_record() {
            println!(
                "run over: {:?}, score {}, {:.1}s survived, {} replay samples",
                record.outcome,
                record.final_score,
                record.duration_seconds,
                record.trace.len()
            );
            persist(&record);
            break;
        }
        if result.elapsed >= max_seconds {
            println!(
                "cap reached: score {} at {:.1}s, {} obstacles live",
                result.score,
                result.elapsed,
                state.obstacles.len()
            );
            break;
        }
        raw_time += FRAME_DT as f64;
    }
}

/// Decide this frame's touch input. Ducks under high obstacles, jumps over
/// everything else once it drifts inside the reaction horizon.
fn autopilot(state: &GameState, was_grounded: bool) -> (u32, u32) {
    let player = &state.player;
    let threat = state
        .obstacles
        .iter()
        .filter(|o| !o.resolved() && o.pos.x + o.radius > player.pos.x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let Some(obs) = threat else {
        return (0, 0);
    };

    let speed = obs.vel.x.abs().max(1.0);
    let time_to_reach = (obs.pos.x - obs.radius - player.pos.x) / speed;
    if time_to_reach > REACT_HORIZON {
        return (0, 0);
    }

    match obs.band {
        VerticalBand::High => (0, 2),
        _ => {
            // single tap only on the frame we are still planted
            if was_grounded && player.can_first_jump {
                (1, 1)
            } else {
                (0, 0)
            }
        }
    }
}

fn persist(record: &shape_dash::sim::RunRecord) {
    let dir = std::env::temp_dir();
    let scores_path: PathBuf = dir.join("shape-dash-highscores.json");
    let best_path: PathBuf = dir.join("shape-dash-bestrun.json");

    let mut scores = HighScores::load(&scores_path);
    if let Some(rank) = scores.add_score(
        record.final_score,
        record.duration_seconds,
        unix_millis(),
    ) {
        println!("new high score, rank {rank}");
        scores.save(&scores_path);
    }

    let mut best = BestRun::load(&best_path);
    if best.offer(record.clone()) {
        best.save(&best_path);
    }
}

fn unix_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
