//! Logic system
//!
//! Calls `update` on every enabled logic component of the active tree.

use crate::ecs::{Scene, SceneError, System};
use crate::foundation::time::Timing;

/// Per-frame logic dispatcher
#[derive(Debug, Default)]
pub struct LogicSystem {
    frame: u64,
}

impl LogicSystem {
    /// Create a system starting at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl System for LogicSystem {
    fn name(&self) -> &'static str {
        "logic"
    }

    fn iterate(&mut self, scene: &mut Scene, dt: f32) -> Result<(), SceneError> {
        let timing = Timing::new(dt, self.frame);
        self.frame += 1;

        // Entities created during the pass wait for the next frame
        let entities: Vec<_> = scene.entities(true).collect();
        for entity in entities {
            // An earlier update may have deactivated or detached a subtree
            if !scene.is_active_in_tree(entity) {
                continue;
            }
            for handle in scene.components_of(entity) {
                // Re-checked per call: an earlier update may have changed it
                if !scene.is_enabled(handle) {
                    continue;
                }
                scene.with_component(handle, |component, ctx| match component.as_logic() {
                    Some(logic) => logic.update(ctx, &timing),
                    None => Ok(()),
                })?;
            }
        }
        Ok(())
    }
}
