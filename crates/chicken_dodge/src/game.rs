//! Game setup and headless session driver

use dodge_engine::prelude::*;

use crate::components::{BoxSprite, Camera, Chicken, Countdown, Heart, Life, Player, Rupee, Score, Spawner};

/// Engine components plus every component of the game
pub fn factory() -> ComponentFactory {
    ComponentFactory::with_engine_components()
        .with::<Player>()
        .with::<Chicken>()
        .with::<Spawner>()
        .with::<Life>()
        .with::<Score>()
        .with::<Countdown>()
        .with::<Rupee>()
        .with::<Heart>()
        .with::<BoxSprite>()
        .with::<Camera>()
}

/// State of a session at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Frames simulated by the engine
    pub frames: u64,
    /// Current score
    pub score: u32,
    /// Remaining life
    pub life: i32,
    /// Chickens spawned so far
    pub spawned: u64,
    /// Whether the player has died
    pub game_over: bool,
}

impl Summary {
    /// Read the game state out of the engine's current scene
    pub fn collect(engine: &Engine) -> Self {
        let mut summary = Self {
            frames: engine.frames(),
            ..Self::default()
        };
        let Some(scene) = engine.scene() else {
            return summary;
        };

        for entity in scene.entities(false) {
            if let Some(score) = scene.get::<Score>(entity) {
                summary.score = score.value();
            }
            if let Some(life) = scene.get::<Life>(entity) {
                summary.life = life.value();
            }
            if let Some(spawner) = scene.get::<Spawner>(entity) {
                summary.spawned = spawner.spawned();
            }
            if let Some(player) = scene.get::<Player>(entity) {
                summary.game_over = player.is_dead();
            }
        }
        summary
    }
}

/// Feed `seconds` of host ticks at `tick_rate` Hz to the engine.
///
/// Stops early once the player is dead.
pub fn run(engine: &mut Engine, seconds: f64, tick_rate: f64) -> Result<Summary, EngineError> {
    let ticks = (seconds * tick_rate).ceil() as u64;
    for tick in 0..=ticks {
        engine.frame(tick as f64 / tick_rate)?;
        if tick % 60 == 0 && Summary::collect(engine).game_over {
            log::info!("Game over after {} ticks", tick);
            break;
        }
    }
    Ok(Summary::collect(engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = include_str!("../assets/scene.ron");
    const CONFIG: &str = include_str!("../assets/config.ron");

    fn engine() -> Engine {
        let config: EngineConfig = ron::from_str(CONFIG).unwrap();
        let mut engine = Engine::new(
            config,
            factory(),
            Box::new(RecordingSurface::new(Viewport::default())),
        )
        .unwrap();
        engine.load_scene(&ron::from_str(SCENE).unwrap()).unwrap();
        engine
    }

    #[test]
    fn test_bundled_config_caps_frame_rate() {
        let config: EngineConfig = ron::from_str(CONFIG).unwrap();
        approx::assert_relative_eq!(
            config.frame.min_frame_interval,
            FrameConfig::default().min_frame_interval
        );
    }

    #[test]
    fn test_bundled_scene_builds() {
        let engine = engine();
        let scene = engine.scene().unwrap();
        let player = scene.find_object("player").unwrap();
        assert_eq!(scene.path(player), "/field/player");
        assert!(!scene.is_enabled(scene.handle_of(player, "Player").unwrap()));
    }

    #[test]
    fn test_countdown_starts_the_game() {
        let mut engine = engine();
        for _ in 0..90 {
            engine.step(1.0 / 60.0).unwrap();
        }
        let scene = engine.scene().unwrap();
        let player = scene.find_object("player").unwrap();
        let spawner = scene.find_object("spawner").unwrap();
        assert!(scene.is_enabled(scene.handle_of(player, "Player").unwrap()));
        assert!(scene.is_enabled(scene.handle_of(spawner, "Spawner").unwrap()));
        assert_eq!(Summary::collect(&engine).spawned, 0);
    }

    #[test]
    fn test_session_spawns_chickens_and_draws_hud() {
        let mut engine = engine();
        let summary = run(&mut engine, 10.0, 60.0).unwrap();

        assert!(summary.frames > 90);
        assert!(summary.spawned > 0);
        assert!((0..=3).contains(&summary.life));
        assert_eq!(summary.game_over, summary.life == 0);

        let surface = engine
            .system::<DisplaySystem>()
            .and_then(DisplaySystem::surface_as::<RecordingSurface>)
            .unwrap();
        assert_eq!(surface.frames(), summary.frames);
        // 60 Hz host ticks against a 30 Hz cap
        assert!(engine.clock().coalesced() > 0);
        assert!(summary.frames < 600);
        let texts: Vec<&str> = surface.texts().collect();
        assert!(texts.iter().any(|t| t.starts_with("Life: ")));
        // The score HUD is switched off at game over
        assert_eq!(texts.iter().any(|t| t.starts_with("Score: ")), !summary.game_over);
    }
}
