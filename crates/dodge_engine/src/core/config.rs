//! # Engine Configuration
//!
//! Serde structures for everything the engine reads at startup: logging,
//! the scene to launch, frame pacing, the physics world and the viewport.
//! Load them through [`Config::load_from_file`] from `.ron` or `.toml`.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::render::Viewport;
use crate::spatial::{QuadTreeConfig, Rectangle};

/// # Frame Pacing
///
/// Limits applied to host timestamps by the frame clock, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Largest step simulated in one frame
    pub max_delta: f32,
    /// Ticks closer together than this are coalesced
    pub min_frame_interval: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            min_frame_interval: 1.0 / 30.0,
        }
    }
}

/// # Physics Configuration
///
/// The quad-tree is rebuilt every frame inside `world_bounds`; colliders
/// outside the bounds still collide but are all stored at the root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Playable area covered by the quad-tree
    pub world_bounds: Rectangle,
    /// Node capacity and depth limits
    pub quad_tree: QuadTreeConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            world_bounds: Rectangle::new(0.0, 800.0, 0.0, 600.0),
            quad_tree: QuadTreeConfig::default(),
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration of an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Resource key of the scene loaded at startup
    pub launch_scene: String,
    /// Path of the resource manifest, relative to the config file
    pub resource_manifest: Option<String>,
    /// Frame pacing
    pub frame: FrameConfig,
    /// Physics world
    pub physics: PhysicsConfig,
    /// Drawable size
    pub viewport: Viewport,
}

impl EngineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            launch_scene: "scene.ron".to_string(),
            resource_manifest: None,
            frame: FrameConfig::default(),
            physics: PhysicsConfig::default(),
            viewport: Viewport::default(),
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the launch scene key
    #[must_use]
    pub fn with_launch_scene(mut self, key: impl Into<String>) -> Self {
        self.launch_scene = key.into();
        self
    }

    /// Set frame pacing
    #[must_use]
    pub fn with_frame(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    /// Set the physics world
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Set the viewport
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Check values that parse fine but cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.to_string()));

        if !(self.frame.max_delta > 0.0) {
            return invalid("frame.max_delta must be positive");
        }
        if self.frame.min_frame_interval < 0.0 {
            return invalid("frame.min_frame_interval must not be negative");
        }
        if self.frame.min_frame_interval >= self.frame.max_delta {
            return invalid("frame.min_frame_interval must be below frame.max_delta");
        }
        if self.physics.quad_tree.max_objects == 0 {
            return invalid("physics.quad_tree.max_objects must be at least 1");
        }
        let bounds = &self.physics.world_bounds;
        if !bounds.is_valid() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return invalid("physics.world_bounds must have a positive area");
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid("viewport must not be empty");
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = EngineConfig::parse(
            Path::new("engine.ron"),
            r#"(
                log_level: "debug",
                physics: (world_bounds: (xMin: 0, xMax: 320, yMin: 0, yMax: 240)),
            )"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.physics.world_bounds.width(), 320.0);
        assert_eq!(config.physics.quad_tree, QuadTreeConfig::default());
        assert_eq!(config.frame, FrameConfig::default());
    }

    #[test]
    fn test_toml_config() {
        let config = EngineConfig::parse(
            Path::new("engine.toml"),
            r#"
                launch_scene = "level1.ron"

                [physics.quad_tree]
                max_objects = 4
                max_levels = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.launch_scene, "level1.ron");
        assert_eq!(config.physics.quad_tree.max_objects, 4);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            EngineConfig::parse(Path::new("engine.json"), "{}"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.physics.quad_tree.max_objects = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = EngineConfig::default().with_physics(PhysicsConfig {
            world_bounds: Rectangle::new(10.0, 0.0, 0.0, 10.0),
            quad_tree: QuadTreeConfig::default(),
        });
        assert!(config.validate().is_err());

        let config = EngineConfig::default().with_frame(FrameConfig {
            max_delta: 0.0,
            min_frame_interval: 0.0,
        });
        assert!(config.validate().is_err());
    }
}
