//! Core engine implementation

use std::sync::Arc;

use thiserror::Error;

use crate::assets::{AssetError, ResourceCache};
use crate::core::config::{ConfigError, EngineConfig};
use crate::ecs::systems::{DisplaySystem, LogicSystem, PhysicSystem};
use crate::ecs::{ComponentFactory, Scene, SceneDesc, SceneError, System};
use crate::foundation::time::FrameClock;
use crate::render::Surface;

/// Main engine struct
///
/// Owns the current scene and runs the systems over it once per frame, in
/// the order physic, logic, display. Loading a scene replaces the previous
/// one as a whole.
pub struct Engine {
    config: EngineConfig,
    factory: Arc<ComponentFactory>,
    scene: Option<Scene>,
    systems: Vec<Box<dyn System>>,
    clock: FrameClock,
    frames: u64,
}

impl Engine {
    /// Create an engine with the standard systems drawing onto `surface`
    pub fn new(config: EngineConfig, factory: ComponentFactory, surface: Box<dyn Surface>) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing engine: {} component types, world {:?}",
            factory.len(),
            config.physics.world_bounds
        );

        let systems: Vec<Box<dyn System>> = vec![
            Box::new(PhysicSystem::new(&config.physics)),
            Box::new(LogicSystem::new()),
            Box::new(DisplaySystem::new(surface)),
        ];

        Ok(Self {
            clock: FrameClock::new(config.frame),
            config,
            factory: Arc::new(factory),
            scene: None,
            systems,
            frames: 0,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Component registry shared with every scene
    pub fn factory(&self) -> &Arc<ComponentFactory> {
        &self.factory
    }

    /// Build a scene from `desc` and make it current.
    ///
    /// On failure the previous scene stays current.
    pub fn load_scene(&mut self, desc: &SceneDesc) -> Result<(), EngineError> {
        let scene = Scene::create(Arc::clone(&self.factory), desc)?;
        log::info!("Scene loaded: {} entities", scene.len());
        if let Some(previous) = self.scene.replace(scene) {
            log::info!("Replaced previous scene ({} entities)", previous.len());
        }
        self.clock.reset();
        Ok(())
    }

    /// Load the scene cached under `key`
    pub fn load_scene_from(&mut self, resources: &ResourceCache, key: &str) -> Result<(), EngineError> {
        let desc = resources.load_scene(key)?;
        self.load_scene(&desc)
    }

    /// Drop the current scene, returning it
    pub fn unload_scene(&mut self) -> Option<Scene> {
        self.scene.take()
    }

    /// Current scene
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Mutable current scene
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Feed a host timestamp in seconds.
    ///
    /// Returns whether the systems ran; coalesced ticks return `false`.
    pub fn frame(&mut self, now: f64) -> Result<bool, EngineError> {
        match self.clock.advance(now) {
            Some(dt) => {
                self.step(dt)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run every system once with `dt` seconds of simulated time
    pub fn step(&mut self, dt: f32) -> Result<(), EngineError> {
        let scene = self.scene.as_mut().ok_or(EngineError::NoScene)?;
        for system in &mut self.systems {
            system.iterate(scene, dt).map_err(|source| {
                log::error!("{} system failed: {}", system.name(), source);
                EngineError::Scene(source)
            })?;
        }
        self.frames += 1;
        Ok(())
    }

    /// Number of completed steps
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Typed access to a system
    pub fn system<S: System>(&self) -> Option<&S> {
        self.systems
            .iter()
            .find_map(|system| system.as_ref().as_any().downcast_ref())
    }

    /// Typed mutable access to a system
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems
            .iter_mut()
            .find_map(|system| system.as_mut().as_any_mut().downcast_mut())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scene", &self.scene)
            .field("systems", &self.systems.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("frames", &self.frames)
            .finish()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be used
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene construction or a system pass failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Resource lookup failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// A frame was requested with no scene loaded
    #[error("No scene loaded")]
    NoScene,
}
