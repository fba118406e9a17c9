//! Display system
//!
//! Two passes over the active tree: every display component draws, then
//! every camera component composites. Geometry of the whole frame is
//! therefore on the surface before any camera presents it.

use crate::ecs::{ComponentHandle, Scene, SceneError, System};
use crate::render::Surface;

/// Per-frame display dispatcher
pub struct DisplaySystem {
    surface: Box<dyn Surface>,
}

impl DisplaySystem {
    /// Create a system drawing onto `surface`
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self { surface }
    }

    /// Drawing target
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Mutable drawing target
    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// Drawing target as its concrete type
    pub fn surface_as<S: Surface>(&self) -> Option<&S> {
        self.surface.as_ref().as_any().downcast_ref()
    }
}

impl std::fmt::Debug for DisplaySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySystem")
            .field("viewport", &self.surface.viewport())
            .finish()
    }
}

impl System for DisplaySystem {
    fn name(&self) -> &'static str {
        "display"
    }

    fn iterate(&mut self, scene: &mut Scene, dt: f32) -> Result<(), SceneError> {
        let handles: Vec<ComponentHandle> = scene
            .entities(true)
            .flat_map(|entity| scene.components_of(entity))
            .filter(|handle| scene.is_enabled(*handle))
            .collect();

        let surface = self.surface.as_mut();
        for &handle in &handles {
            scene.with_component(handle, |component, ctx| match component.as_display() {
                Some(display) => display.display(ctx, &mut *surface, dt),
                None => Ok(()),
            })?;
        }
        for &handle in &handles {
            scene.with_component(handle, |component, ctx| match component.as_camera() {
                Some(camera) => camera.render(ctx, &mut *surface, dt),
                None => Ok(()),
            })?;
        }
        Ok(())
    }
}
