//! Axis-aligned rectangle

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    /// Left edge
    pub x_min: f32,
    /// Right edge
    pub x_max: f32,
    /// Bottom edge
    pub y_min: f32,
    /// Top edge
    pub y_max: f32,
}

impl Rectangle {
    /// Create a rectangle from its bounds
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Create a rectangle from its center and size
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x_min: x - width / 2.0,
            x_max: x + width / 2.0,
            y_min: y - height / 2.0,
            y_max: y + height / 2.0,
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Vertical extent
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Center point `(x, y)`
    pub fn center(&self) -> (f32, f32) {
        (
            self.x_min + self.width() / 2.0,
            self.y_min + self.height() / 2.0,
        )
    }

    /// Whether the rectangle has a positive area
    pub fn is_valid(&self) -> bool {
        self.x_max > self.x_min && self.y_max > self.y_min
    }

    /// Overlap test.
    ///
    /// Rectangles that only share an edge or a corner do not intersect.
    pub fn intersects_with(&self, other: &Self) -> bool {
        !(self.x_min >= other.x_max
            || self.x_max <= other.x_min
            || self.y_min >= other.y_max
            || self.y_max <= other.y_min)
    }

    /// Whether `other` lies entirely inside this rectangle (edges included)
    pub fn contains(&self, other: &Self) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Copy moved by `(dx, dy)`
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x_min + dx, self.x_max + dx, self.y_min + dy, self.y_max + dy)
    }
}
