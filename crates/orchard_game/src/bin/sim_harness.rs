//! Headless replay runner: loads a map, plays a recorded input sequence one
//! fixed step per frame, and reports where the actor and camera ended up.

use std::path::PathBuf;

use orchard_core::replay::load_replay_from_path;
use orchard_core::scene;
use orchard_core::{load_config_from_path, GameConfig};

fn usage() -> String {
    "Usage: cargo run -p orchard_game --bin sim_harness -- <map.json> <replay.json> [config.json]\nExample: cargo run -p orchard_game --bin sim_harness -- assets/maps/farm.json assets/replays/walk_right.json".to_string()
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        return Err(usage());
    }

    let map_path = PathBuf::from(&args[1]);
    let replay_path = PathBuf::from(&args[2]);
    let config = match args.get(3) {
        Some(path) => load_config_from_path(&PathBuf::from(path)).map_err(|e| e.to_string())?,
        None => GameConfig::default(),
    };

    let replay = load_replay_from_path(&replay_path).map_err(|e| e.to_string())?;
    let mut state = scene::load_scene(&map_path, &config).map_err(|e| e.to_string())?;

    let counts = replay.run(&mut state);
    let focus = state.camera_focus();
    log::info!(
        "Replay finished: {} steps ({} moved, {} blocked, {} idle)",
        counts.total(),
        counts.accepted,
        counts.rejected,
        counts.idle
    );
    log::info!(
        "Actor at ({:.3}, {:.3}), camera at ({:.3}, {:.3})",
        state.position.x,
        state.position.y,
        focus.center.x,
        focus.center.y
    );

    scene::teardown(state);
    Ok(())
}
