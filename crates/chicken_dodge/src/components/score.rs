//! Score counter
//!
//! Survival earns a point every `framesPerPoint` frames; pickups add more
//! through [`Score::add`].

use dodge_engine::prelude::*;
use serde::Deserialize;

use super::Point;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScoreDesc {
    frames_per_point: u64,
    hud: Point,
}

impl Default for ScoreDesc {
    fn default() -> Self {
        Self {
            frames_per_point: 30,
            hud: Point::default(),
        }
    }
}

/// Player score
#[derive(Debug, Default)]
pub struct Score {
    value: u32,
    frames_per_point: u64,
    frames: u64,
    hud: Point,
}

impl Component for Score {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: ScoreDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.frames_per_point = desc.frames_per_point;
        self.hud = desc.hud;
        Ok(())
    }

    fn on_disabled(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
        log::info!("Final score: {}", self.value);
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }

    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        Some(self)
    }
}

impl LogicComponent for Score {
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _timing: &Timing) -> Result<(), SceneError> {
        self.frames += 1;
        if self.frames_per_point > 0 && self.frames % self.frames_per_point == 0 {
            self.value += 1;
        }
        Ok(())
    }
}

impl DisplayComponent for Score {
    fn display(&mut self, _ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, _dt: f32) -> Result<(), SceneError> {
        surface.draw_text(self.hud.x, self.hud.y, &format!("Score: {}", self.value));
        Ok(())
    }
}

impl ComponentKind for Score {
    const TYPE_NAME: &'static str = "Score";
}

impl Score {
    /// Current score
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Add `points`
    pub fn add(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_survival_points_accumulate() {
        let factory = ComponentFactory::new().with::<Score>();
        let desc = ron::from_str(r#"{ "score": { "components": { "Score": { "framesPerPoint": 3 } } } }"#).unwrap();
        let mut scene = Scene::create(Arc::new(factory), &desc).unwrap();
        let mut logic = LogicSystem::new();
        for _ in 0..7 {
            logic.iterate(&mut scene, 0.1).unwrap();
        }

        let score = scene.find_object("score").unwrap();
        assert_eq!(scene.get::<Score>(score).unwrap().value(), 2);
        scene.get_mut::<Score>(score).unwrap().add(5);
        assert_eq!(scene.get::<Score>(score).unwrap().value(), 7);
    }
}
