//! Flat-colored box sprite
//!
//! Draws the owner's collision box, or a box of `size` around its world
//! position when the owner has no Collider.

use dodge_engine::ecs::components::Size;
use dodge_engine::prelude::*;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BoxSpriteDesc {
    color: Color,
    size: Size,
}

/// Colored rectangle drawn every frame
#[derive(Debug, Default)]
pub struct BoxSprite {
    /// Fill color
    pub color: Color,
    size: Size,
}

impl Component for BoxSprite {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: BoxSpriteDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.color = desc.color;
        self.size = desc.size;
        Ok(())
    }

    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        Some(self)
    }
}

impl DisplayComponent for BoxSprite {
    fn display(&mut self, ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, _dt: f32) -> Result<(), SceneError> {
        let owner = ctx.owner();
        let area = match ctx.scene.get::<Collider>(owner) {
            Some(collider) => collider.area(ctx.scene, owner)?,
            None => {
                let center = Position::world_position(ctx.scene, owner)?;
                Rectangle::from_center(center.x, center.y, self.size.w, self.size.h)
            }
        };
        surface.fill_rect(area, self.color);
        Ok(())
    }
}

impl ComponentKind for BoxSprite {
    const TYPE_NAME: &'static str = "BoxSprite";
}
