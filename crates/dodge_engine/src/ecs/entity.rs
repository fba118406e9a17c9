//! Entity node storage
//!
//! Entities are nodes of the scene tree. They are owned by the scene's arena
//! and referred to by [`EntityId`]; hierarchy edits go through
//! [`Scene`](super::Scene) because they touch two nodes at once.

use std::collections::HashMap;

use super::component::Component;

slotmap::new_key_type! {
    /// Entity identifier
    pub struct EntityId;
}

#[derive(Debug, Clone)]
struct ChildEntry {
    name: String,
    order: u64,
    id: EntityId,
}

/// Storage for one component on an entity
pub(crate) struct ComponentSlot {
    pub(crate) kind: &'static str,
    pub(crate) enabled: bool,
    /// `None` while the component is executing
    pub(crate) instance: Option<Box<dyn Component>>,
    /// Distinguishes this slot from a later replacement of the same type
    pub(crate) serial: u64,
    /// Enable hooks that arrived while the component was executing
    pub(crate) pending_hooks: Vec<bool>,
}

impl ComponentSlot {
    pub(crate) fn new(kind: &'static str, instance: Box<dyn Component>, serial: u64) -> Self {
        Self {
            kind,
            enabled: true,
            instance: Some(instance),
            serial,
            pending_hooks: Vec::new(),
        }
    }
}

/// Node in the scene tree
pub struct Entity {
    active: bool,
    parent: Option<EntityId>,
    next_child_order: u64,
    children: Vec<ChildEntry>,
    children_by_name: HashMap<String, EntityId>,
    pub(crate) components: Vec<ComponentSlot>,
}

impl Entity {
    pub(crate) fn new() -> Self {
        Self {
            active: true,
            parent: None,
            next_child_order: 0,
            children: Vec::new(),
            children_by_name: HashMap::new(),
            components: Vec::new(),
        }
    }

    /// Whether systems should visit this entity and its subtree
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Parent entity, if attached
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    /// Children in attachment order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = EntityId> + '_ {
        self.children.iter().map(|entry| entry.id)
    }

    /// Children with their names, in attachment order
    pub fn named_children(&self) -> impl Iterator<Item = (&str, EntityId)> + '_ {
        self.children.iter().map(|entry| (entry.name.as_str(), entry.id))
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Direct child lookup by name.
    ///
    /// When several children share a name the most recently attached one
    /// wins.
    pub fn get_child(&self, name: &str) -> Option<EntityId> {
        self.children_by_name.get(name).copied()
    }

    /// Name this entity's parent knows `child` by
    pub fn child_name(&self, child: EntityId) -> Option<&str> {
        self.children
            .iter()
            .find(|entry| entry.id == child)
            .map(|entry| entry.name.as_str())
    }

    /// Record a new child; returns `true` if the name shadowed another child
    pub(crate) fn push_child(&mut self, name: &str, child: EntityId) -> bool {
        let order = self.next_child_order;
        self.next_child_order += 1;
        self.children.push(ChildEntry {
            name: name.to_string(),
            order,
            id: child,
        });
        debug_assert!(self.children.windows(2).all(|w| w[0].order < w[1].order));
        self.children_by_name
            .insert(name.to_string(), child)
            .is_some()
    }

    /// Forget a child; returns `false` if it was not a child
    pub(crate) fn take_child(&mut self, child: EntityId) -> bool {
        let Some(index) = self.children.iter().position(|entry| entry.id == child) else {
            return false;
        };
        let entry = self.children.remove(index);
        if self.children_by_name.get(&entry.name) == Some(&child) {
            self.children_by_name.remove(&entry.name);
        }
        true
    }

    /// Component type names in insertion order
    pub fn component_kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|slot| slot.kind)
    }

    /// Whether a component of this type is attached
    pub fn has_component(&self, kind: &str) -> bool {
        self.slot(kind).is_some()
    }

    /// Enabled state of a component, if attached
    pub fn is_component_enabled(&self, kind: &str) -> Option<bool> {
        self.slot(kind).map(|slot| slot.enabled)
    }

    pub(crate) fn slot(&self, kind: &str) -> Option<&ComponentSlot> {
        self.components.iter().find(|slot| slot.kind == kind)
    }

    pub(crate) fn slot_mut(&mut self, kind: &str) -> Option<&mut ComponentSlot> {
        self.components.iter_mut().find(|slot| slot.kind == kind)
    }

    /// Store a component, replacing any existing one of the same type in place
    pub(crate) fn put_slot(&mut self, slot: ComponentSlot) {
        match self.slot_mut(slot.kind) {
            Some(existing) => *existing = slot,
            None => self.components.push(slot),
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("active", &self.active)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.component_kinds().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<EntityId> {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn test_children_keep_attachment_order() {
        let ids = ids(4);
        let mut entity = Entity::new();
        entity.push_child("c", ids[0]);
        entity.push_child("a", ids[1]);
        entity.push_child("b", ids[2]);
        assert!(entity.take_child(ids[1]));
        entity.push_child("a", ids[3]);

        let order: Vec<_> = entity.children().collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_name_index_shadowing_and_removal() {
        let ids = ids(2);
        let mut entity = Entity::new();
        assert!(!entity.push_child("dup", ids[0]));
        assert!(entity.push_child("dup", ids[1]));
        assert_eq!(entity.get_child("dup"), Some(ids[1]));

        // Removing the shadowed child keeps the newer entry
        assert!(entity.take_child(ids[0]));
        assert_eq!(entity.get_child("dup"), Some(ids[1]));

        assert!(entity.take_child(ids[1]));
        assert_eq!(entity.get_child("dup"), None);
        assert!(!entity.take_child(ids[1]));
    }
}
