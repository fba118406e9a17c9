//! Chicken component
//!
//! A chicken runs in a straight line towards its target, drops a rupee the
//! first time it overshoots it and leaves the scene once it has travelled
//! `maxDistance`. Hit by an attacking player, it drops a heart or a rupee
//! and turns back.

use std::sync::atomic::{AtomicU64, Ordering};

use dodge_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::{despawn_self, missing_position, set_collider_enabled, Point};

static DROP_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChickenDesc {
    attack: i32,
    heart_attack_chance: f64,
    heart_template: EntityDesc,
    rupee_template: EntityDesc,
    target: Point,
    speed: Option<f32>,
    max_distance: f32,
    seed: Option<u64>,
}

impl Default for ChickenDesc {
    fn default() -> Self {
        Self {
            attack: 1,
            heart_attack_chance: 0.0,
            heart_template: EntityDesc::default(),
            rupee_template: EntityDesc::default(),
            target: Point::default(),
            speed: None,
            max_distance: 500.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Item {
    Rupee,
    Heart,
}

/// Enemy that crosses the play area
#[derive(Debug)]
pub struct Chicken {
    /// Damage dealt to the player on contact
    pub attack: i32,
    heart_attack_chance: f64,
    heart_template: EntityDesc,
    rupee_template: EntityDesc,
    target: Vec3,
    speed: Option<f32>,
    max_distance: f32,
    velocity: Vec3,
    distance: f32,
    dropped: bool,
    rng: StdRng,
}

impl Default for Chicken {
    fn default() -> Self {
        Self {
            attack: 1,
            heart_attack_chance: 0.0,
            heart_template: EntityDesc::default(),
            rupee_template: EntityDesc::default(),
            target: Vec3::zeros(),
            speed: None,
            max_distance: 500.0,
            velocity: Vec3::zeros(),
            distance: 0.0,
            dropped: false,
            rng: StdRng::seed_from_u64(0),
        }
    }
}

impl Component for Chicken {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: ChickenDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.attack = desc.attack;
        self.heart_attack_chance = desc.heart_attack_chance;
        self.heart_template = desc.heart_template;
        self.rupee_template = desc.rupee_template;
        self.target = Vec3::new(desc.target.x, desc.target.y, 0.0);
        self.speed = desc.speed;
        self.max_distance = desc.max_distance;
        self.rng = desc.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> Result<(), SceneError> {
        let owner = ctx.owner();
        let position = ctx.sibling::<Position>().ok_or_else(|| missing_position(owner))?;
        let speed = match self.speed {
            Some(speed) => speed,
            None => self.rng.gen_range(30.0..75.0),
        };
        let heading = (self.target - position.local)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        self.velocity = heading * speed;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Chicken {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> Result<(), SceneError> {
        let delta = self.velocity * timing.dt;
        let target = self.target;
        let owner = ctx.owner();
        let position = ctx.sibling_mut::<Position>().ok_or_else(|| missing_position(owner))?;
        let before = (target - position.local).norm_squared();
        position.translate(delta);
        let after = (target - position.local).norm_squared();

        if !self.dropped && after > before {
            self.drop(ctx, Item::Rupee)?;
        }

        self.distance += delta.norm();
        if self.distance > self.max_distance {
            despawn_self(ctx)?;
        }
        Ok(())
    }
}

impl ComponentKind for Chicken {
    const TYPE_NAME: &'static str = "Chicken";
}

impl Chicken {
    /// Current velocity in units per second
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether this chicken has dropped an item yet
    pub fn has_dropped(&self) -> bool {
        self.dropped
    }

    /// React to a player attack: drop an item, stop colliding and turn back
    pub fn on_attack(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
        let item = if self.rng.gen::<f64>() < self.heart_attack_chance {
            Item::Heart
        } else {
            Item::Rupee
        };
        self.drop(ctx, item)?;
        set_collider_enabled(ctx, false)?;
        self.velocity.x = -self.velocity.x;
        Ok(())
    }

    fn drop(&mut self, ctx: &mut ComponentContext<'_>, item: Item) -> Result<(), SceneError> {
        self.dropped = true;

        let template = match item {
            Item::Rupee => &self.rupee_template,
            Item::Heart => &self.heart_template,
        };
        if template.components.is_empty() {
            return Ok(());
        }

        let owner = ctx.owner();
        let (Some(parent), Some(position)) = (ctx.scene.parent(owner), ctx.scene.get::<Position>(owner)) else {
            return Ok(());
        };
        let at = position.local;
        let mut desc = template.clone();
        desc.components.insert(Position::TYPE_NAME, Position::desc(at.x, at.y, at.z));

        let name = format!("drop{}", DROP_ID.fetch_add(1, Ordering::Relaxed));
        log::debug!("Chicken dropped {:?} as '{}'", item, name);
        ctx.scene.create_child(&desc, &name, parent)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Rupee;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn build(chicken: &str) -> Scene {
        let text = format!(
            r#"{{ "field": {{ "children": {{
                "hen": {{ "components": {{
                    "Position": {{ "x": 0, "y": 0 }},
                    "Chicken": {chicken},
                    "Collider": {{ "flag": 2, "mask": 1, "size": {{ "w": 4, "h": 4 }} }},
                }} }},
            }} }} }}"#
        );
        let factory = ComponentFactory::with_engine_components()
            .with::<Chicken>()
            .with::<Rupee>();
        Scene::create(Arc::new(factory), &ron::from_str(&text).unwrap()).unwrap()
    }

    fn drops(scene: &Scene) -> usize {
        let field = scene.find_object("field").unwrap();
        scene
            .children(field)
            .filter(|child| scene.get::<Rupee>(*child).is_some())
            .count()
    }

    #[test]
    fn test_heads_towards_target() {
        let scene = build(r#"{ "target": { "x": 30, "y": 40 }, "speed": Some(10) }"#);
        let hen = scene.find_object("hen").unwrap();
        let velocity = scene.get::<Chicken>(hen).unwrap().velocity();
        assert_relative_eq!(velocity.x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(velocity.y, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_drops_rupee_when_passing_target() {
        let mut scene = build(
            r#"{ "target": { "x": 9, "y": 0 }, "speed": Some(40),
                 "rupeeTemplate": { "components": { "Rupee": () } } }"#,
        );
        let hen = scene.find_object("hen").unwrap();
        let mut logic = LogicSystem::new();
        for _ in 0..2 {
            logic.iterate(&mut scene, 0.1).unwrap();
        }
        assert_eq!(drops(&scene), 0);

        logic.iterate(&mut scene, 0.1).unwrap();
        assert!(scene.get::<Chicken>(hen).unwrap().has_dropped());
        assert_eq!(drops(&scene), 1);

        logic.iterate(&mut scene, 0.1).unwrap();
        assert_eq!(drops(&scene), 1);
    }

    #[test]
    fn test_leaves_after_max_distance() {
        let mut scene = build(r#"{ "target": { "x": 100, "y": 0 }, "speed": Some(10), "maxDistance": 2.5 }"#);
        let hen = scene.find_object("hen").unwrap();
        let mut logic = LogicSystem::new();
        for _ in 0..2 {
            logic.iterate(&mut scene, 0.1).unwrap();
        }
        assert!(scene.contains(hen));
        logic.iterate(&mut scene, 0.1).unwrap();
        assert!(!scene.contains(hen));
    }

    #[test]
    fn test_attack_turns_back_and_drops() {
        let mut scene = build(
            r#"{ "target": { "x": 10, "y": 0 }, "speed": Some(5), "heartAttackChance": 0.0,
                 "rupeeTemplate": { "components": { "Rupee": () } } }"#,
        );
        let hen = scene.find_object("hen").unwrap();
        scene.with_typed::<Chicken, _>(hen, |chicken, ctx| chicken.on_attack(ctx)).unwrap();

        assert_relative_eq!(scene.get::<Chicken>(hen).unwrap().velocity().x, -5.0, epsilon = 1e-5);
        assert!(!scene.is_enabled(scene.handle_of(hen, "Collider").unwrap()));
        assert_eq!(drops(&scene), 1);
    }
}
