//! System trait

use super::component::AsAny;
use super::{Scene, SceneError};

/// Per-frame pass over the scene
///
/// Systems run once per frame in a fixed order. An error aborts the rest of
/// the frame.
pub trait System: AsAny {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// Run one frame with `dt` seconds of simulated time
    fn iterate(&mut self, scene: &mut Scene, dt: f32) -> Result<(), SceneError>;
}
