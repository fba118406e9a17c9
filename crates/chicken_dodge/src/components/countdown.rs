//! Start countdown
//!
//! Shows the remaining seconds, then calls its handler and switches itself
//! off.

use dodge_engine::prelude::*;
use serde::Deserialize;

use super::Point;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CountdownDesc {
    delay: u64,
    #[serde(deserialize_with = "desc_reference")]
    handler: Option<String>,
    hud: Point,
}

/// Frame countdown that fires a handler when it elapses
#[derive(Debug, Default)]
pub struct Countdown {
    delay: u64,
    elapsed: u64,
    dt: f32,
    hud: Point,
    handler: EventTrigger<ComponentHandle>,
}

impl Component for Countdown {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: CountdownDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.delay = desc.delay;
        self.hud = desc.hud;
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: CountdownDesc = parse_desc(Self::TYPE_NAME, desc)?;
        if let Some(reference) = desc.handler {
            let (target, method) = ctx.scene.resolve_method(ctx.owner(), &reference)?;
            self.handler.add(target, method);
        }
        Ok(())
    }

    fn on_enabled(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
        self.elapsed = 0;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }

    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        Some(self)
    }
}

impl LogicComponent for Countdown {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> Result<(), SceneError> {
        self.dt = timing.dt;
        self.elapsed += 1;
        if self.elapsed >= self.delay {
            log::debug!("Countdown elapsed after {} frames", self.elapsed);
            ctx.scene.dispatch(&self.handler, &[])?;
            ctx.set_self_enabled(false)?;
        }
        Ok(())
    }
}

impl DisplayComponent for Countdown {
    fn display(&mut self, _ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, _dt: f32) -> Result<(), SceneError> {
        let remaining = self.remaining() as f32 * self.dt;
        surface.draw_text(self.hud.x, self.hud.y, &format!("Ready: {}", remaining.ceil()));
        Ok(())
    }
}

impl ComponentKind for Countdown {
    const TYPE_NAME: &'static str = "Countdown";
}

impl Countdown {
    /// Frames left before the handler fires
    pub fn remaining(&self) -> u64 {
        self.delay.saturating_sub(self.elapsed)
    }
}
