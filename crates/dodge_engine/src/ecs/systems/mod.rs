//! ECS Systems module
//!
//! The engine runs them in this order every frame: physic, logic, display.

pub mod physics;
pub mod logic;
pub mod display;

pub use physics::{Collision, PhysicStats, PhysicSystem};
pub use logic::LogicSystem;
pub use display::DisplaySystem;
