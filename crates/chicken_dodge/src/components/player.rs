//! Player component
//!
//! The player patrols the game area horizontally and swings its weapon every
//! `attackInterval` frames. Touching a chicken hurts unless the player is
//! attacking; touching a rupee or a heart collects it. After a hit the
//! player is knocked back for `hurtDuration` frames and cannot be hit again
//! for `invulnerableDuration` frames.

use dodge_engine::prelude::*;
use serde::Deserialize;

use super::{missing_position, set_collider_enabled, Area, BoxSprite, Chicken, Heart, Life, LifeChange, Rupee, Score};

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlayerDesc {
    #[serde(deserialize_with = "desc_reference")]
    score: Option<String>,
    #[serde(deserialize_with = "desc_reference")]
    life: Option<String>,
    game_area: Area,
    speed: f32,
    attack_interval: u64,
    attack_duration: u64,
    hurt_duration: u64,
    hurt_motion: f32,
    invulnerable_duration: u64,
}

impl Default for PlayerDesc {
    fn default() -> Self {
        Self {
            score: None,
            life: None,
            game_area: Area::default(),
            speed: 120.0,
            attack_interval: 90,
            attack_duration: 20,
            hurt_duration: 15,
            hurt_motion: 120.0,
            invulnerable_duration: 60,
        }
    }
}

/// Player avatar
#[derive(Debug, Default)]
pub struct Player {
    score: Option<EntityId>,
    life: Option<EntityId>,
    game_area: Area,
    speed: f32,
    direction: f32,
    attack_interval: u64,
    attack_duration: u64,
    hurt_duration: u64,
    hurt_motion: f32,
    invulnerable_duration: u64,
    attack_left: u64,
    hurt_left: u64,
    invulnerable_left: u64,
    dead: bool,
}

impl Component for Player {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: PlayerDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.game_area = desc.game_area;
        self.speed = desc.speed;
        self.direction = 1.0;
        self.attack_interval = desc.attack_interval;
        self.attack_duration = desc.attack_duration;
        self.hurt_duration = desc.hurt_duration;
        self.hurt_motion = desc.hurt_motion;
        self.invulnerable_duration = desc.invulnerable_duration;
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: PlayerDesc = parse_desc(Self::TYPE_NAME, desc)?;
        if let Some(reference) = desc.score {
            self.score = Some(ctx.find_component(&reference)?.entity);
        }
        if let Some(reference) = desc.life {
            self.life = Some(ctx.find_component(&reference)?.entity);
        }
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }

    fn as_collision_handler(&mut self) -> Option<&mut dyn CollisionHandler> {
        Some(self)
    }
}

impl LogicComponent for Player {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> Result<(), SceneError> {
        let velocity = if self.dead {
            0.0
        } else if self.hurt_left > 0 {
            self.hurt_left -= 1;
            -self.direction * self.hurt_motion
        } else {
            if self.attack_left > 0 {
                self.attack_left -= 1;
            } else if self.attack_interval > 0 && timing.frame % self.attack_interval == 0 {
                self.attack_left = self.attack_duration;
            }
            self.direction * self.speed
        };

        if self.invulnerable_left > 0 {
            self.invulnerable_left -= 1;
            if self.invulnerable_left == 0 && !self.dead {
                set_collider_enabled(ctx, true)?;
            }
        }

        let owner = ctx.owner();
        if let Some(sprite) = ctx.scene.handle_of(owner, BoxSprite::TYPE_NAME) {
            let visible = self.invulnerable_left == 0 || timing.frame % 2 != 0;
            ctx.scene.set_enabled(sprite, visible)?;
        }

        let area = self.game_area;
        let position = ctx.sibling_mut::<Position>().ok_or_else(|| missing_position(owner))?;
        position.translate(Vec3::new(velocity * timing.dt, 0.0, 0.0));
        position.clamp(
            Vec3::new(area.x, area.y, f32::MIN),
            Vec3::new(area.x + area.w, area.y + area.h, f32::MAX),
        );

        let x = position.local.x;
        if x <= area.x {
            self.direction = 1.0;
        } else if x >= area.x + area.w {
            self.direction = -1.0;
        }
        Ok(())
    }
}

impl CollisionHandler for Player {
    fn on_collision(&mut self, ctx: &mut ComponentContext<'_>, other: ComponentHandle) -> Result<(), SceneError> {
        if self.dead {
            return Ok(());
        }
        let item = other.entity;

        if let Some((kind, value)) = ctx.scene.get::<Rupee>(item).map(|r| (r.kind().to_string(), r.value())) {
            if let Some(score) = self.score.and_then(|score| ctx.scene.get_mut::<Score>(score)) {
                score.add(value);
            }
            log::debug!("Collected a {} rupee worth {}", kind, value);
            return ctx.scene.despawn(item);
        }

        if let Some(heal) = ctx.scene.get::<Heart>(item).map(Heart::heal) {
            let change = self.change_life(ctx, |life, ctx| life.heal(ctx, heal))?;
            log::debug!("Collected a heart: {:?}", change);
            return ctx.scene.despawn(item);
        }

        if let Some(attack) = ctx.scene.get::<Chicken>(item).map(|chicken| chicken.attack) {
            if self.is_attacking() {
                ctx.scene.with_typed::<Chicken, _>(item, |chicken, ctx| chicken.on_attack(ctx))?;
            } else if self.invulnerable_left == 0 {
                let change = self.change_life(ctx, |life, ctx| life.damage(ctx, attack))?;
                self.react(ctx, change)?;
            }
        }
        Ok(())
    }
}

impl ComponentKind for Player {
    const TYPE_NAME: &'static str = "Player";
}

impl Player {
    /// Whether the weapon is out
    pub fn is_attacking(&self) -> bool {
        self.attack_left > 0
    }

    /// Whether the player has lost all its life
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Whether hits are currently ignored
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_left > 0
    }

    fn change_life(
        &self,
        ctx: &mut ComponentContext<'_>,
        f: impl FnOnce(&mut Life, &mut ComponentContext<'_>) -> Result<LifeChange, SceneError>,
    ) -> Result<LifeChange, SceneError> {
        let Some(life) = self.life else {
            return Ok(LifeChange::Unchanged);
        };
        Ok(ctx.scene.with_typed::<Life, _>(life, f)?.unwrap_or(LifeChange::Unchanged))
    }

    fn react(&mut self, ctx: &mut ComponentContext<'_>, change: LifeChange) -> Result<(), SceneError> {
        match change {
            LifeChange::Hurt => {
                self.hurt_left = self.hurt_duration;
                self.invulnerable_left = self.invulnerable_duration;
                self.attack_left = 0;
                if self.invulnerable_left > 0 {
                    set_collider_enabled(ctx, false)?;
                }
                Ok(())
            }
            LifeChange::Dead => {
                log::info!("Player is dead");
                self.dead = true;
                self.attack_left = 0;
                set_collider_enabled(ctx, false)
            }
            LifeChange::Healed | LifeChange::Unchanged => Ok(()),
        }
    }
}
