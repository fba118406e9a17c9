//! Player health
//!
//! Handlers listed under `onDead` and `onHurt` are `"Type.method"` or
//! `"entity.Type.method"` references. The caller of [`Life::change`] learns
//! the outcome from the return value instead of subscribing, since it is
//! usually the component executing at that moment.

use dodge_engine::prelude::*;
use serde::Deserialize;

use super::Point;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LifeDesc {
    max: i32,
    default: i32,
    on_dead: Vec<String>,
    on_hurt: Vec<String>,
    hud: Point,
}

impl Default for LifeDesc {
    fn default() -> Self {
        Self {
            max: 3,
            default: 3,
            on_dead: Vec::new(),
            on_hurt: Vec::new(),
            hud: Point::default(),
        }
    }
}

/// Result of a life change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeChange {
    /// Value stayed the same
    Unchanged,
    /// Value went up
    Healed,
    /// Value went down but stayed above zero
    Hurt,
    /// Value reached zero
    Dead,
}

/// Bounded life counter with death and hurt notifications
#[derive(Debug, Default)]
pub struct Life {
    value: i32,
    max: i32,
    hud: Point,
    dead_event: EventTrigger<ComponentHandle>,
    hurt_event: EventTrigger<ComponentHandle>,
}

impl Component for Life {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: LifeDesc = parse_desc(Self::TYPE_NAME, desc)?;
        if desc.max <= 0 {
            return Err(SceneError::InvalidDescriptor {
                kind: Self::TYPE_NAME.to_string(),
                message: format!("max must be positive, got {}", desc.max),
            });
        }
        self.max = desc.max;
        self.value = desc.default.clamp(0, desc.max);
        self.hud = desc.hud;
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: LifeDesc = parse_desc(Self::TYPE_NAME, desc)?;
        let owner = ctx.owner();
        for reference in &desc.on_dead {
            let (target, method) = ctx.scene.resolve_method(owner, reference)?;
            self.dead_event.add(target, method);
        }
        for reference in &desc.on_hurt {
            let (target, method) = ctx.scene.resolve_method(owner, reference)?;
            self.hurt_event.add(target, method);
        }
        Ok(())
    }

    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        Some(self)
    }
}

impl DisplayComponent for Life {
    fn display(&mut self, _ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, _dt: f32) -> Result<(), SceneError> {
        surface.draw_text(self.hud.x, self.hud.y, &format!("Life: {}/{}", self.value, self.max));
        Ok(())
    }
}

impl ComponentKind for Life {
    const TYPE_NAME: &'static str = "Life";
}

impl Life {
    /// Current value
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Upper bound
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Whether the value is zero
    pub fn is_dead(&self) -> bool {
        self.value == 0
    }

    /// Lose `amount` points
    pub fn damage(&mut self, ctx: &mut ComponentContext<'_>, amount: i32) -> Result<LifeChange, SceneError> {
        self.set_value(ctx, self.value - amount)
    }

    /// Regain `amount` points
    pub fn heal(&mut self, ctx: &mut ComponentContext<'_>, amount: i32) -> Result<LifeChange, SceneError> {
        self.set_value(ctx, self.value + amount)
    }

    /// Set the value, clamped to `[0, max]`.
    ///
    /// Dropping to zero fires the death handlers once; any other decrease
    /// fires the hurt handlers.
    pub fn set_value(&mut self, ctx: &mut ComponentContext<'_>, value: i32) -> Result<LifeChange, SceneError> {
        let previous = self.value;
        self.value = value.clamp(0, self.max);

        let change = match self.value.cmp(&previous) {
            std::cmp::Ordering::Equal => LifeChange::Unchanged,
            std::cmp::Ordering::Greater => LifeChange::Healed,
            std::cmp::Ordering::Less if self.value == 0 => LifeChange::Dead,
            std::cmp::Ordering::Less => LifeChange::Hurt,
        };

        match change {
            LifeChange::Dead => {
                log::info!("{} died", ctx.scene.path(ctx.owner()));
                ctx.scene.dispatch(&self.dead_event, &[])?;
            }
            LifeChange::Hurt => {
                log::debug!("Life down to {}", self.value);
                ctx.scene.dispatch(&self.hurt_event, &[EventArg::Int(i64::from(self.value))])?;
            }
            LifeChange::Healed | LifeChange::Unchanged => {}
        }
        Ok(change)
    }

    /// Handlers called on death
    pub fn dead_event_mut(&mut self) -> &mut EventTrigger<ComponentHandle> {
        &mut self.dead_event
    }

    /// Handlers called when hurt
    pub fn hurt_event_mut(&mut self) -> &mut EventTrigger<ComponentHandle> {
        &mut self.hurt_event
    }
}
