//! Chicken spawner
//!
//! Every `spawnDelay` frames a chicken built from `chickenTemplate` enters
//! from an edge of `sourceArea`, aimed at a random point of `targetArea`.
//! The delay shrinks by `spawnWaitFactor` after each spawn, down to 8
//! frames.

use dodge_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::{Area, Chicken};

const MIN_SPAWN_DELAY: f32 = 8.0;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SpawnerDesc {
    source_area: Area,
    target_area: Area,
    spawn_delay: f32,
    spawn_wait_factor: f32,
    chicken_template: EntityDesc,
    seed: Option<u64>,
}

impl Default for SpawnerDesc {
    fn default() -> Self {
        Self {
            source_area: Area::default(),
            target_area: Area::default(),
            spawn_delay: 60.0,
            spawn_wait_factor: 0.95,
            chicken_template: EntityDesc::default(),
            seed: None,
        }
    }
}

/// Creates chickens at an accelerating pace
#[derive(Debug)]
pub struct Spawner {
    source_area: Area,
    target_area: Area,
    spawn_delay: f32,
    spawn_wait_factor: f32,
    chicken_template: EntityDesc,
    spawned: u64,
    rng: StdRng,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            source_area: Area::default(),
            target_area: Area::default(),
            spawn_delay: 60.0,
            spawn_wait_factor: 0.95,
            chicken_template: EntityDesc::default(),
            spawned: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }
}

impl Component for Spawner {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: SpawnerDesc = parse_desc(Self::TYPE_NAME, desc)?;
        if desc.chicken_template.components.get(Chicken::TYPE_NAME).is_none() {
            return Err(SceneError::InvalidDescriptor {
                kind: Self::TYPE_NAME.to_string(),
                message: "chickenTemplate has no Chicken component".to_string(),
            });
        }
        self.source_area = desc.source_area;
        self.target_area = desc.target_area;
        self.spawn_delay = desc.spawn_delay.max(1.0);
        self.spawn_wait_factor = desc.spawn_wait_factor;
        self.chicken_template = desc.chicken_template;
        self.rng = desc.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Spawner {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> Result<(), SceneError> {
        let delay = (self.spawn_delay.floor() as u64).max(1);
        if timing.frame % delay == 0 {
            self.spawn_delay = (self.spawn_delay * self.spawn_wait_factor).max(MIN_SPAWN_DELAY);
            self.spawn(ctx, timing.frame)?;
        }
        Ok(())
    }
}

impl ComponentKind for Spawner {
    const TYPE_NAME: &'static str = "Spawner";
}

impl Spawner {
    /// Chickens created so far
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Current delay between spawns, in frames
    pub fn spawn_delay(&self) -> f32 {
        self.spawn_delay
    }

    /// Random point on the border of the source area
    fn entry_point(&mut self) -> Vec2 {
        let area = self.source_area;
        let far_side = self.rng.gen_bool(0.5);
        if self.rng.gen_bool(0.5) {
            let x = if far_side { area.x + area.w } else { area.x };
            Vec2::new(x, area.y + self.rng.gen::<f32>() * area.h)
        } else {
            let y = if far_side { area.y + area.h } else { area.y };
            Vec2::new(area.x + self.rng.gen::<f32>() * area.w, y)
        }
    }

    fn spawn(&mut self, ctx: &mut ComponentContext<'_>, frame: u64) -> Result<(), SceneError> {
        let from = self.entry_point();
        let to = self.target_area.sample(&mut self.rng);
        let seed: u32 = self.rng.gen();

        let mut desc = self.chicken_template.clone();
        desc.components.insert(Position::TYPE_NAME, Position::desc(from.x, from.y, 0.0));
        let chicken = desc
            .components
            .get_mut(Chicken::TYPE_NAME)
            .ok_or_else(|| SceneError::Component("chickenTemplate lost its Chicken".to_string()))?;
        desc_insert(
            chicken,
            "target",
            desc_map([("x", desc_number(to.x)), ("y", desc_number(to.y))]),
        )?;
        desc_insert(
            chicken,
            "seed",
            ron::Value::Option(Some(Box::new(ron::Value::Number(i64::from(seed).into())))),
        )?;

        let owner = ctx.owner();
        ctx.scene.create_child(&desc, &format!("chicken{frame}"), owner)?;
        self.spawned += 1;
        log::debug!(
            "Spawned chicken #{} at ({:.0}, {:.0}), next in {:.1} frames",
            self.spawned,
            from.x,
            from.y,
            self.spawn_delay
        );
        Ok(())
    }
}
