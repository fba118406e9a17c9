//! Quad-tree spatial partitioning structure
//!
//! Recursively divides the plane into four quadrants to prune collision
//! candidate pairs. An object is stored at the shallowest node whose
//! quadrant fully contains its area; an object that straddles a mid line
//! stays at the current node. Nodes split lazily once they hold more than
//! `max_objects` and are shallower than `max_levels`.
//!
//! Candidate retrieval follows a single path: it descends only into the one
//! quadrant fully containing the query area, collecting the objects stored
//! at every node on the way. Objects held in sibling quadrants are never
//! returned, even when the query area straddles into them from a parent.

use serde::{Deserialize, Serialize};

use super::Rectangle;

/// Configuration for quad-tree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Objects a node may hold before it splits
    pub max_objects: usize,

    /// Deepest level a node may split at (root is level 0)
    pub max_levels: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            max_levels: 5,
        }
    }
}

/// Child quadrant of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Low x, low y
    BottomLeft = 0,
    /// Low x, high y
    TopLeft = 1,
    /// High x, low y
    BottomRight = 2,
    /// High x, high y
    TopRight = 3,
}

/// Single node in the quad-tree hierarchy
#[derive(Debug, Clone)]
pub struct QuadTreeNode<T> {
    level: u32,
    bounds: Rectangle,
    objects: Vec<(T, Rectangle)>,
    nodes: Option<Box<[QuadTreeNode<T>; 4]>>,
}

impl<T: Copy> QuadTreeNode<T> {
    /// Create a new leaf node
    pub fn new(level: u32, bounds: Rectangle) -> Self {
        Self {
            level,
            bounds,
            objects: Vec::new(),
            nodes: None,
        }
    }

    /// Depth of this node (root is 0)
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Region covered by this node
    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }

    /// Objects stored directly at this node
    pub fn objects(&self) -> &[(T, Rectangle)] {
        &self.objects
    }

    /// Child nodes, if split
    pub fn children(&self) -> Option<&[QuadTreeNode<T>; 4]> {
        self.nodes.as_deref()
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.nodes.is_none()
    }

    /// Drop all objects and children
    pub fn clear(&mut self) {
        self.objects.clear();
        self.nodes = None;
    }

    /// Quadrant that fully contains `area`, if any.
    ///
    /// Containment is strict: an area touching a mid line belongs to no
    /// quadrant.
    pub fn quadrant(&self, area: &Rectangle) -> Option<Quadrant> {
        let (vertical_mid, horizontal_mid) = self.bounds.center();

        let top = area.y_min > horizontal_mid;
        let bottom = area.y_max < horizontal_mid;
        let left = area.x_max < vertical_mid;
        let right = area.x_min > vertical_mid;

        match (left, right, bottom, top) {
            (true, _, true, _) => Some(Quadrant::BottomLeft),
            (true, _, _, true) => Some(Quadrant::TopLeft),
            (_, true, true, _) => Some(Quadrant::BottomRight),
            (_, true, _, true) => Some(Quadrant::TopRight),
            _ => None,
        }
    }

    fn split(&mut self) {
        let b = self.bounds;
        let (x_mid, y_mid) = b.center();
        let level = self.level + 1;

        log::trace!("Splitting quad-tree node at level {} ({:?})", self.level, b);

        // Indexed by `Quadrant as usize`
        self.nodes = Some(Box::new([
            Self::new(level, Rectangle::new(b.x_min, x_mid, b.y_min, y_mid)),
            Self::new(level, Rectangle::new(b.x_min, x_mid, y_mid, b.y_max)),
            Self::new(level, Rectangle::new(x_mid, b.x_max, b.y_min, y_mid)),
            Self::new(level, Rectangle::new(x_mid, b.x_max, y_mid, b.y_max)),
        ]));
    }

    /// Insert an object with its area
    pub fn insert(&mut self, object: T, area: Rectangle, config: &QuadTreeConfig) {
        if let Some(quadrant) = self.quadrant(&area) {
            if let Some(nodes) = self.nodes.as_mut() {
                nodes[quadrant as usize].insert(object, area, config);
                return;
            }
        }

        self.objects.push((object, area));

        if self.objects.len() > config.max_objects && self.level < config.max_levels {
            if self.nodes.is_none() {
                self.split();
            }
            self.redistribute(config);
        }
    }

    /// Push every object that now fits a child quadrant down into it
    fn redistribute(&mut self, config: &QuadTreeConfig) {
        let pending = std::mem::take(&mut self.objects);
        for (object, area) in pending {
            match (self.quadrant(&area), self.nodes.as_mut()) {
                (Some(quadrant), Some(nodes)) => {
                    nodes[quadrant as usize].insert(object, area, config);
                }
                _ => self.objects.push((object, area)),
            }
        }
    }

    /// Append the candidates for `area` to `out`.
    ///
    /// Candidates from the containing child come first, then this node's own
    /// objects.
    pub fn retrieve_into(&self, area: &Rectangle, out: &mut Vec<T>) {
        if let (Some(quadrant), Some(nodes)) = (self.quadrant(area), self.nodes.as_ref()) {
            nodes[quadrant as usize].retrieve_into(area, out);
        }
        out.extend(self.objects.iter().map(|(object, _)| *object));
    }

    /// Number of objects in this node and all descendants
    pub fn count_objects(&self) -> usize {
        let below = self
            .nodes
            .as_ref()
            .map_or(0, |nodes| nodes.iter().map(Self::count_objects).sum());
        self.objects.len() + below
    }

    /// Deepest level reached below (and including) this node
    pub fn depth(&self) -> u32 {
        self.nodes.as_ref().map_or(self.level, |nodes| {
            nodes.iter().map(Self::depth).max().unwrap_or(self.level)
        })
    }
}

/// Quad-tree over a fixed world region
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    root: QuadTreeNode<T>,
    config: QuadTreeConfig,
}

impl<T: Copy> QuadTree<T> {
    /// Create an empty tree covering `bounds`
    pub fn new(bounds: Rectangle, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadTreeNode::new(0, bounds),
            config,
        }
    }

    /// Return to a single empty root bucket
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Insert an object with its area
    pub fn insert(&mut self, object: T, area: Rectangle) {
        self.root.insert(object, area, &self.config);
    }

    /// Collision candidates for `area`
    pub fn retrieve(&self, area: &Rectangle) -> Vec<T> {
        let mut out = Vec::new();
        self.root.retrieve_into(area, &mut out);
        out
    }

    /// Total number of stored objects
    pub fn len(&self) -> usize {
        self.root.count_objects()
    }

    /// Whether the tree holds no objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest node level currently allocated
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    /// Root node
    pub fn root(&self) -> &QuadTreeNode<T> {
        &self.root
    }

    /// Active configuration
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }
}
