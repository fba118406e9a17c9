//! Drawing surface abstraction
//!
//! Display components draw through [`Surface`] and never see the backend.
//! [`RecordingSurface`] keeps the commands of each frame in memory, which is
//! what headless runs and tests use.

use serde::{Deserialize, Serialize};

use crate::ecs::AsAny;
use crate::spatial::Rectangle;

/// RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Size of the drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle in world units
    Rect {
        /// Covered area
        area: Rectangle,
        /// Fill color
        color: Color,
    },
    /// Text anchored at a point
    Text {
        /// Anchor x
        x: f32,
        /// Anchor y
        y: f32,
        /// Text to draw
        text: String,
    },
}

/// Target of the display pass
pub trait Surface: AsAny {
    /// Drawable size
    fn viewport(&self) -> Viewport;

    /// Fill a rectangle
    fn fill_rect(&mut self, area: Rectangle, color: Color);

    /// Draw a line of text
    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    /// Finish the frame
    fn present(&mut self);
}

/// Surface that records draw commands instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    pending: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingSurface {
    /// Create a surface of the given size
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Commands drawn since the last `present`
    pub fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    /// Commands of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of presented frames
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text lines of the last presented frame, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.last_frame.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_rect(&mut self, area: Rectangle, color: Color) {
        self.pending.push(DrawCommand::Rect { area, color });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        self.pending.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames += 1;
        log::trace!("Presented frame {} ({} commands)", self.frames, self.last_frame.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_moves_pending_to_last_frame() {
        let mut surface = RecordingSurface::new(Viewport::default());
        surface.fill_rect(Rectangle::new(2.0, 3.0, 2.0, 3.0), Color::BLACK);
        surface.fill_rect(Rectangle::new(0.0, 1.0, 0.0, 1.0), Color::WHITE);
        surface.draw_text(4.0, 8.0, "Score: 3");
        assert_eq!(surface.pending().len(), 3);

        surface.present();
        assert!(surface.pending().is_empty());
        assert_eq!(surface.last_frame().len(), 3);
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["Score: 3"]);
    }

    #[test]
    fn test_color_alpha_defaults_to_opaque() {
        let color: Color = ron::from_str("(r: 1.0, g: 0.5, b: 0.0)").unwrap();
        assert_eq!(color, Color::rgb(1.0, 0.5, 0.0));
    }
}
