//! Position component
//!
//! Positions are relative to the parent entity's position when the parent
//! has one. A parent without a Position ends the chain.

use serde::Deserialize;

use crate::ecs::component::{desc_map, desc_number, parse_desc, Component, ComponentDesc, ComponentKind};
use crate::ecs::{EntityId, Scene, SceneError};
use crate::foundation::math::{self, Vec3};

/// Local position of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Offset from the parent's position
    pub local: Vec3,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PositionDesc {
    x: f32,
    y: f32,
    z: f32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            local: Vec3::zeros(),
        }
    }
}

impl Component for Position {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: PositionDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.local = Vec3::new(desc.x, desc.y, desc.z);
        Ok(())
    }
}

impl ComponentKind for Position {
    const TYPE_NAME: &'static str = "Position";
}

impl Position {
    /// Create from coordinates
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            local: Vec3::new(x, y, z),
        }
    }

    /// Descriptor for these coordinates, for building entities at runtime
    pub fn desc(x: f32, y: f32, z: f32) -> ComponentDesc {
        desc_map([("x", desc_number(x)), ("y", desc_number(y)), ("z", desc_number(z))])
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.local += delta;
    }

    /// Keep each axis of the local position inside `[min, max]`
    pub fn clamp(&mut self, min: Vec3, max: Vec3) {
        for axis in 0..3 {
            self.local[axis] = math::clamp(self.local[axis], min[axis], max[axis]);
        }
    }

    /// Absolute position of `entity`: its local position plus the world
    /// position of each ancestor that has a Position, up to the first one
    /// that does not.
    pub fn world_position(scene: &Scene, entity: EntityId) -> Result<Vec3, SceneError> {
        let own = scene
            .get::<Self>(entity)
            .ok_or_else(|| SceneError::MissingComponent {
                entity,
                kind: Self::TYPE_NAME.to_string(),
            })?;

        let mut world = own.local;
        let mut cursor = scene.parent(entity);
        while let Some(parent) = cursor {
            let Some(position) = scene.get::<Self>(parent) else {
                break;
            };
            world += position.local;
            cursor = scene.parent(parent);
        }
        Ok(world)
    }
}
