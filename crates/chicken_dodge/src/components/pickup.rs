//! Items dropped by chickens: rupees and hearts
//!
//! Both vanish after `lifetime` frames unless the player picks them up
//! first. A lifetime of 0 keeps the item until it is collected.

use dodge_engine::foundation::collections::OrderedMap;
use dodge_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::despawn_self;

#[derive(Debug, Default)]
struct Expiry {
    age: u64,
    lifetime: u64,
}

impl Expiry {
    fn tick(&mut self) -> bool {
        self.age += 1;
        self.lifetime > 0 && self.age > self.lifetime
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RupeeDesc {
    values: OrderedMap<u32>,
    lifetime: u64,
    seed: Option<u64>,
}

/// Collectible worth points
#[derive(Debug, Default)]
pub struct Rupee {
    kind: String,
    value: u32,
    expiry: Expiry,
}

impl Component for Rupee {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: RupeeDesc = parse_desc(Self::TYPE_NAME, desc)?;
        let mut rng = desc.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        // A rupee without a value table is worth a single point
        if !desc.values.is_empty() {
            let pick = rng.gen_range(0..desc.values.len());
            if let Some((kind, value)) = desc.values.iter().nth(pick) {
                self.kind = kind.to_string();
                self.value = *value;
            }
        } else {
            self.kind = "green".to_string();
            self.value = 1;
        }
        self.expiry.lifetime = desc.lifetime;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Rupee {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _timing: &Timing) -> Result<(), SceneError> {
        if self.expiry.tick() {
            despawn_self(ctx)?;
        }
        Ok(())
    }
}

impl ComponentKind for Rupee {
    const TYPE_NAME: &'static str = "Rupee";
}

impl Rupee {
    /// Points awarded when collected
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Name of the rolled rupee type
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HeartDesc {
    heal: i32,
    lifetime: u64,
}

impl Default for HeartDesc {
    fn default() -> Self {
        Self {
            heal: 1,
            lifetime: 0,
        }
    }
}

/// Collectible that restores life
#[derive(Debug, Default)]
pub struct Heart {
    heal: i32,
    expiry: Expiry,
}

impl Component for Heart {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: HeartDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.heal = desc.heal;
        self.expiry.lifetime = desc.lifetime;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Heart {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _timing: &Timing) -> Result<(), SceneError> {
        if self.expiry.tick() {
            despawn_self(ctx)?;
        }
        Ok(())
    }
}

impl ComponentKind for Heart {
    const TYPE_NAME: &'static str = "Heart";
}

impl Heart {
    /// Life restored when collected
    pub fn heal(&self) -> i32 {
        self.heal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn scene(text: &str) -> Scene {
        let factory = ComponentFactory::with_engine_components().with::<Rupee>().with::<Heart>();
        Scene::create(Arc::new(factory), &ron::from_str(text).unwrap()).unwrap()
    }

    #[test]
    fn test_rupee_rolls_a_listed_value() {
        let scene = scene(
            r#"{ "gem": { "components": {
                "Rupee": { "values": { "green": 1, "blue": 5, "red": 20 }, "seed": Some(7) },
            } } }"#,
        );
        let rupee = scene.get::<Rupee>(scene.find_object("gem").unwrap()).unwrap();
        let expected = match rupee.kind() {
            "green" => 1,
            "blue" => 5,
            "red" => 20,
            other => panic!("unexpected kind {other}"),
        };
        assert_eq!(rupee.value(), expected);
    }

    #[test]
    fn test_rupee_without_values_is_worth_one() {
        let scene = scene(r#"{ "gem": { "components": { "Rupee": () } } }"#);
        assert_eq!(scene.get::<Rupee>(scene.find_object("gem").unwrap()).unwrap().value(), 1);
    }

    #[test]
    fn test_heart_expires_after_lifetime() {
        let mut scene = scene(r#"{ "heart": { "components": { "Heart": { "heal": 2, "lifetime": 2 } } } }"#);
        let heart = scene.find_object("heart").unwrap();
        assert_eq!(scene.get::<Heart>(heart).unwrap().heal(), 2);

        let mut logic = LogicSystem::new();
        logic.iterate(&mut scene, 0.1).unwrap();
        logic.iterate(&mut scene, 0.1).unwrap();
        assert!(scene.contains(heart));
        logic.iterate(&mut scene, 0.1).unwrap();
        assert!(!scene.contains(heart));
    }
}
