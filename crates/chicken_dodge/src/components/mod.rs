//! Game-specific components

mod box_sprite;
mod camera;
mod chicken;
mod countdown;
mod life;
mod pickup;
mod player;
mod score;
mod spawner;

pub use box_sprite::BoxSprite;
pub use camera::Camera;
pub use chicken::Chicken;
pub use countdown::Countdown;
pub use life::{Life, LifeChange};
pub use pickup::{Heart, Rupee};
pub use player::Player;
pub use score::Score;
pub use spawner::Spawner;

use dodge_engine::prelude::*;
use rand::Rng;
use serde::Deserialize;

/// Axis-aligned area given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Area {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Area {
    /// Uniformly random point inside the area
    pub fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            self.x + rng.gen::<f32>() * self.w,
            self.y + rng.gen::<f32>() * self.h,
        )
    }

    /// Smallest corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Largest corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }
}

/// Screen anchor for HUD text
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

/// Error for a component that needs its owner's Position
fn missing_position(entity: EntityId) -> SceneError {
    SceneError::MissingComponent {
        entity,
        kind: Position::TYPE_NAME.to_string(),
    }
}

/// Enable or disable the Collider next to the running component, if any
fn set_collider_enabled(ctx: &mut ComponentContext<'_>, enabled: bool) -> Result<(), SceneError> {
    let owner = ctx.owner();
    match ctx.scene.handle_of(owner, Collider::TYPE_NAME) {
        Some(collider) => ctx.scene.set_enabled(collider, enabled),
        None => Ok(()),
    }
}

/// Detach and destroy the running component's owner
fn despawn_self(ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
    let owner = ctx.owner();
    log::trace!("Despawning {}", ctx.scene.path(owner));
    ctx.scene.despawn(owner)
}
