//! Physics module for collision filtering
//!
//! Overlap tests live on [`crate::spatial::Rectangle`]; the per-frame
//! broad/narrow phase is [`crate::ecs::systems::PhysicSystem`].

pub mod collision_layers;

pub use collision_layers::CollisionLayers;
