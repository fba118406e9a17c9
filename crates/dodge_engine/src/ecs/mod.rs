//! Entity-Component-System implementation
//!
//! Entities form a named tree owned by a [`Scene`]. Components are trait
//! objects created by name through a [`ComponentFactory`]. Systems visit the
//! active part of the tree once per frame and call the components that
//! expose their capability.

pub mod entity;
pub mod component;
pub mod factory;
pub mod scene;
pub mod error;
pub mod system;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityId};
pub use component::{
    AsAny, CameraComponent, CollisionHandler, Component, ComponentContext, ComponentDesc,
    ComponentHandle, ComponentKind, DisplayComponent, EventReceiver, LogicComponent,
};
pub use factory::ComponentFactory;
pub use scene::{Entities, EntityDesc, Scene, SceneDesc};
pub use error::SceneError;
pub use system::System;
