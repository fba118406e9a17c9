//! Math utilities and types
//!
//! The engine simulates a 2D world but positions keep a `z` component so
//! that layering information can ride along with the entity transform.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Clamp `x` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics when the bounds are inverted;
/// `max` wins in that case, which is what frame-time clamping expects.
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    x.max(min).min(max)
}

/// Returns `true` if `min <= x <= max`
pub fn in_range(x: f32, min: f32, max: f32) -> bool {
    min <= x && x <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_and_outside() {
        assert_eq!(clamp(0.05, 0.0, 0.1), 0.05);
        assert_eq!(clamp(-1.0, 0.0, 0.1), 0.0);
        assert_eq!(clamp(3.0, 0.0, 0.1), 0.1);
    }

    #[test]
    fn test_clamp_inverted_bounds_prefers_max() {
        assert_eq!(clamp(5.0, 10.0, 1.0), 1.0);
    }

    #[test]
    fn test_in_range_is_inclusive() {
        assert!(in_range(1.0, 1.0, 2.0));
        assert!(in_range(2.0, 1.0, 2.0));
        assert!(!in_range(2.5, 1.0, 2.0));
    }
}
