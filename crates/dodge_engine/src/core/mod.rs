//! # Core Engine Module
//!
//! Engine-wide configuration shared by the other subsystems.

pub mod config;

pub use config::{Config, ConfigError, EngineConfig, FrameConfig, PhysicsConfig};
