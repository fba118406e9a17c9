//! # Dodge Engine
//!
//! Runtime core of a small 2D entity-component game engine.
//!
//! ## Features
//!
//! - **Scene graph**: named entity tree with two-phase construction from RON
//!   scene descriptions
//! - **Components**: trait objects created by name, joining system passes
//!   through capability traits
//! - **Systems**: physic (quad-tree collision), logic and display passes run
//!   once per frame in that order
//! - **Events**: named multi-subscriber triggers wired between components
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dodge_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut engine = Engine::new(
//!         config,
//!         ComponentFactory::with_engine_components(),
//!         Box::new(RecordingSurface::new(Viewport::default())),
//!     )?;
//!     engine.load_scene(&ron::from_str(r#"{ "player": { "components": { "Position": () } } }"#)?)?;
//!     engine.step(1.0 / 30.0)?;
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod config;
pub mod core;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod spatial;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ResourceCache},
        core::config::{Config, ConfigError, EngineConfig, FrameConfig, PhysicsConfig},
        ecs::components::{Collider, Enabler, Position},
        ecs::systems::{DisplaySystem, LogicSystem, PhysicSystem},
        ecs::component::{desc_insert, desc_map, desc_number, desc_reference, parse_desc},
        ecs::{
            CameraComponent, CollisionHandler, Component, ComponentContext, ComponentDesc, ComponentFactory,
            ComponentHandle, ComponentKind, DisplayComponent, EntityDesc, EntityId, EventReceiver, LogicComponent,
            Scene, SceneDesc, SceneError, System,
        },
        events::{EventArg, EventTrigger},
        foundation::{
            math::{Vec2, Vec3},
            time::Timing,
        },
        physics::CollisionLayers,
        render::{Color, RecordingSurface, Surface, Viewport},
        spatial::Rectangle,
        Engine, EngineError,
    };
}
