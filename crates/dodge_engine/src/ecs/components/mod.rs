//! Engine components
//!
//! Components every scene can use without game-specific registration.

pub mod position;
pub mod collider;
pub mod enabler;

pub use position::Position;
pub use collider::{Collider, Size};
pub use enabler::Enabler;
