//! Chicken Dodge
//!
//! Headless run of the game: loads the configuration and the launch scene,
//! feeds the engine a fixed-rate host clock and logs the outcome.
//!
//! Usage: `chicken_dodge [config.ron] [seconds]`

use std::path::{Path, PathBuf};

use chicken_dodge::game;
use dodge_engine::foundation::logging;
use dodge_engine::prelude::*;

const DEFAULT_CONFIG: &str = "assets/config.ron";
const DEFAULT_SECONDS: f64 = 60.0;
const TICK_RATE: f64 = 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string()));
    let seconds = match args.next() {
        Some(value) => value.parse::<f64>()?,
        None => DEFAULT_SECONDS,
    };

    let config = EngineConfig::load_from_file(&config_path)?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting Chicken Dodge with {}", config_path.display());

    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    let mut resources = ResourceCache::new();
    if let Some(manifest) = &config.resource_manifest {
        resources.load_manifest(base.join(manifest))?;
    } else {
        let scene = std::fs::read_to_string(base.join(&config.launch_scene))?;
        resources.insert_text(&config.launch_scene, scene);
    }

    let viewport = config.viewport;
    let launch_scene = config.launch_scene.clone();
    let mut engine = Engine::new(config, game::factory(), Box::new(RecordingSurface::new(viewport)))?;
    engine.load_scene_from(&resources, &launch_scene)?;

    let summary = game::run(&mut engine, seconds, TICK_RATE)?;
    log::info!(
        "Session finished: {} frames, score {}, life {}, {} chickens{}",
        summary.frames,
        summary.score,
        summary.life,
        summary.spawned,
        if summary.game_over { ", game over" } else { "" }
    );
    Ok(())
}
