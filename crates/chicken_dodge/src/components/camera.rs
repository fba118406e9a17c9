//! Camera component

use dodge_engine::prelude::*;

/// Presents the frame once every display component has drawn
#[derive(Debug, Default)]
pub struct Camera {
    frames: u64,
}

impl Component for Camera {
    fn as_camera(&mut self) -> Option<&mut dyn CameraComponent> {
        Some(self)
    }
}

impl CameraComponent for Camera {
    fn render(&mut self, _ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, _dt: f32) -> Result<(), SceneError> {
        surface.present();
        self.frames += 1;
        Ok(())
    }
}

impl ComponentKind for Camera {
    const TYPE_NAME: &'static str = "Camera";
}

impl Camera {
    /// Frames presented by this camera
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
