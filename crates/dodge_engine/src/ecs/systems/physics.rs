//! Physic system
//!
//! Broad phase through a quad-tree rebuilt every frame, narrow phase with
//! the strict rectangle overlap test.
//!
//! Per frame:
//! 1. Collect every enabled collider of the active tree with its area.
//! 2. Insert them all into the cleared quad-tree.
//! 3. For each collider, test the retrieved candidates whose flag is in its
//!    mask. Each unordered pair is tested at most once.
//! 4. Notify the handler of each side of every overlapping pair.
//!
//! All collisions of a frame are found before any handler runs, so a
//! handler that moves or removes something cannot hide a collision that
//! already happened this frame.

use std::collections::HashSet;

use crate::core::config::PhysicsConfig;
use crate::ecs::components::Collider;
use crate::ecs::{ComponentHandle, ComponentKind, Scene, SceneError, System};
use crate::physics::CollisionLayers;
use crate::spatial::{QuadTree, Rectangle};

/// Collider state captured at the start of a frame
#[derive(Debug, Clone, Copy)]
struct Body {
    collider: ComponentHandle,
    handler: Option<ComponentHandle>,
    area: Rectangle,
    flag: CollisionLayers,
    mask: CollisionLayers,
}

/// Overlapping pair found in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// Collider whose query found the pair
    pub first: ComponentHandle,
    /// The candidate it overlapped
    pub second: ComponentHandle,
}

/// Counters from the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicStats {
    /// Colliders taking part
    pub colliders: usize,
    /// Pairs that passed the mask test and were checked for overlap
    pub pair_tests: usize,
    /// Overlapping pairs
    pub collisions: usize,
    /// Quad-tree depth after insertion
    pub tree_depth: u32,
}

/// Per-frame collision detection
#[derive(Debug)]
pub struct PhysicSystem {
    tree: QuadTree<usize>,
    bodies: Vec<Body>,
    pairs: Vec<(usize, usize)>,
    stats: PhysicStats,
}

impl PhysicSystem {
    /// Create a system covering the configured world
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            tree: QuadTree::new(config.world_bounds, config.quad_tree),
            bodies: Vec::new(),
            pairs: Vec::new(),
            stats: PhysicStats::default(),
        }
    }

    /// Counters from the last frame
    pub fn stats(&self) -> PhysicStats {
        self.stats
    }

    /// Pairs found in the last frame, in detection order
    pub fn collisions(&self) -> impl Iterator<Item = Collision> + '_ {
        self.pairs.iter().map(|&(a, b)| Collision {
            first: self.bodies[a].collider,
            second: self.bodies[b].collider,
        })
    }

    /// Quad-tree as built in the last frame
    pub fn tree(&self) -> &QuadTree<usize> {
        &self.tree
    }

    fn collect(&mut self, scene: &Scene) -> Result<(), SceneError> {
        self.bodies.clear();
        for entity in scene.entities(true) {
            let Some(handle) = scene.handle_of(entity, Collider::TYPE_NAME) else {
                continue;
            };
            if !scene.is_enabled(handle) {
                continue;
            }
            let Some(collider) = scene.get::<Collider>(entity) else {
                continue;
            };
            self.bodies.push(Body {
                collider: handle,
                handler: collider.handler(),
                area: collider.area(scene, entity)?,
                flag: collider.flag,
                mask: collider.mask,
            });
        }
        Ok(())
    }

    fn detect(&mut self) -> usize {
        self.tree.clear();
        for (index, body) in self.bodies.iter().enumerate() {
            self.tree.insert(index, body.area);
        }

        self.pairs.clear();
        let mut tested = HashSet::new();
        let mut candidates = Vec::new();
        for (i, first) in self.bodies.iter().enumerate() {
            candidates.clear();
            self.tree.root().retrieve_into(&first.area, &mut candidates);

            for &j in &candidates {
                if i == j {
                    continue;
                }
                let second = &self.bodies[j];
                if !first.mask.accepts(second.flag) {
                    continue;
                }
                if !tested.insert((i.min(j), i.max(j))) {
                    continue;
                }
                if first.area.intersects_with(&second.area) {
                    log::trace!("{} hits {}", first.collider.kind, second.collider.kind);
                    self.pairs.push((i, j));
                }
            }
        }
        tested.len()
    }
}

fn notify(scene: &mut Scene, handler: Option<ComponentHandle>, other: ComponentHandle) -> Result<(), SceneError> {
    let Some(handler) = handler else {
        return Ok(());
    };
    if !scene.contains(handler.entity) {
        log::trace!("Collision handler left the scene before notification");
        return Ok(());
    }
    scene.with_component(handler, |component, ctx| match component.as_collision_handler() {
        Some(receiver) => receiver.on_collision(ctx, other),
        None => Ok(()),
    })?;
    Ok(())
}

impl System for PhysicSystem {
    fn name(&self) -> &'static str {
        "physic"
    }

    fn iterate(&mut self, scene: &mut Scene, _dt: f32) -> Result<(), SceneError> {
        self.collect(scene)?;
        let pair_tests = self.detect();

        self.stats = PhysicStats {
            colliders: self.bodies.len(),
            pair_tests,
            collisions: self.pairs.len(),
            tree_depth: self.tree.depth(),
        };
        log::debug!(
            "Physics: {} colliders, {} pair tests, {} collisions",
            self.stats.colliders,
            self.stats.pair_tests,
            self.stats.collisions
        );

        for &(a, b) in &self.pairs {
            let (first, second) = (self.bodies[a], self.bodies[b]);
            notify(scene, first.handler, second.collider)?;
            notify(scene, second.handler, first.collider)?;
        }
        Ok(())
    }
}
