//! Spatial partitioning and queries

pub mod rectangle;
pub mod quad_tree;

pub use rectangle::Rectangle;
pub use quad_tree::{Quadrant, QuadTree, QuadTreeConfig, QuadTreeNode};
