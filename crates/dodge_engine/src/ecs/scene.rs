//! Scene graph
//!
//! A [`Scene`] owns every entity in a slot-map arena under a permanent root.
//! Entity trees are built from a declarative [`SceneDesc`] in two phases:
//! every entity and component of the batch is created first, then `setup`
//! runs on each new component in creation order. Setup can therefore resolve
//! references to any entity declared in the same batch.
//!
//! Components are called through [`Scene::with_component`], which takes the
//! component out of its slot for the duration of the call so it can edit the
//! scene freely.

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use slotmap::SlotMap;

use super::component::{Component, ComponentContext, ComponentDesc, ComponentHandle, ComponentKind};
use super::entity::{ComponentSlot, Entity, EntityId};
use super::{ComponentFactory, SceneError};
use crate::events::{EventArg, EventTrigger};
use crate::foundation::collections::OrderedMap;

/// Named entity descriptions, in document order
pub type SceneDesc = OrderedMap<EntityDesc>;

/// Declarative description of one entity
///
/// Written as a map with optional `"components"` and `"children"` keys:
///
/// ```text
/// "player": {
///     "components": { "Position": { "x": 10 } },
///     "children": { "shadow": { "components": { "Position": () } } },
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDesc {
    /// Component descriptors keyed by type name
    pub components: OrderedMap<ComponentDesc>,
    /// Child entities keyed by name
    pub children: SceneDesc,
}

impl EntityDesc {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a component descriptor
    #[must_use]
    pub fn with_component(mut self, kind: &str, desc: ComponentDesc) -> Self {
        self.components.insert(kind, desc);
        self
    }

    /// Add or replace a child description
    #[must_use]
    pub fn with_child(mut self, name: &str, child: Self) -> Self {
        self.children.insert(name, child);
        self
    }
}

impl Serialize for EntityDesc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("components", &self.components)?;
        map.serialize_entry("children", &self.children)?;
        map.end()
    }
}

struct EntityDescVisitor;

impl<'de> Visitor<'de> for EntityDescVisitor {
    type Value = EntityDesc;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with optional \"components\" and \"children\"")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EntityDesc, A::Error> {
        let mut desc = EntityDesc::default();
        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "components" => desc.components = access.next_value()?,
                "children" => desc.children = access.next_value()?,
                other => {
                    return Err(de::Error::unknown_field(other, &["components", "children"]));
                }
            }
        }
        Ok(desc)
    }

    fn visit_unit<E: de::Error>(self) -> Result<EntityDesc, E> {
        Ok(EntityDesc::default())
    }
}

impl<'de> Deserialize<'de> for EntityDesc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityDescVisitor)
    }
}

type PendingSetup<'d> = Vec<(ComponentHandle, &'d ComponentDesc)>;

/// The active hierarchy of entities
pub struct Scene {
    entities: SlotMap<EntityId, Entity>,
    root: EntityId,
    factory: Arc<ComponentFactory>,
    next_serial: u64,
}

impl Scene {
    /// Create an empty scene
    pub fn new(factory: Arc<ComponentFactory>) -> Self {
        let mut entities = SlotMap::with_key();
        let root = entities.insert(Entity::new());
        Self {
            entities,
            root,
            factory,
            next_serial: 0,
        }
    }

    /// Build a scene from a description
    pub fn create(factory: Arc<ComponentFactory>, desc: &SceneDesc) -> Result<Self, SceneError> {
        let mut scene = Self::new(factory);
        let root = scene.root;
        let mut pending = Vec::new();
        scene.create_children(desc, root, &mut pending)?;
        log::debug!(
            "Scene structure complete: {} entities, {} components to set up",
            scene.len(),
            pending.len()
        );
        scene.setup_pending(pending)?;
        Ok(scene)
    }

    /// Component registry used by this scene
    pub fn factory(&self) -> &Arc<ComponentFactory> {
        &self.factory
    }

    /// Permanent root entity
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Number of live entities, excluding the root
    pub fn len(&self) -> usize {
        self.entities.len() - 1
    }

    /// Whether the scene holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entity id is live
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Borrow an entity node
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    fn node(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(id).ok_or(SceneError::EntityNotFound(id))
    }

    fn node_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        self.entities.get_mut(id).ok_or(SceneError::EntityNotFound(id))
    }

    // ---- hierarchy ----

    /// Create a detached, empty entity
    pub fn spawn(&mut self) -> EntityId {
        self.entities.insert(Entity::new())
    }

    /// Attach `child` under `parent` with the given name.
    ///
    /// Fails if `child` already has a parent.
    pub fn add_child(&mut self, parent: EntityId, name: &str, child: EntityId) -> Result<(), SceneError> {
        self.node(parent)?;
        if child == self.root || self.node(child)?.parent().is_some() {
            return Err(SceneError::AlreadyParented { child });
        }

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(SceneError::CyclicAttachment { parent, child });
            }
            cursor = self.parent(current);
        }

        if self.node_mut(parent)?.push_child(name, child) {
            log::warn!("'{}' shadows an existing child of {}", name, self.path(parent));
        }
        self.node_mut(child)?.set_parent(Some(parent));
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// The entity and its subtree stay alive but unreachable; see
    /// [`destroy`](Self::destroy) and [`despawn`](Self::despawn).
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), SceneError> {
        if child == self.root {
            return Err(SceneError::CannotRemoveRoot);
        }
        if self.node(child)?.parent() != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.node_mut(parent)?.take_child(child);
        self.node_mut(child)?.set_parent(None);
        Ok(())
    }

    /// Direct child lookup by name
    pub fn get_child(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        self.entities.get(parent)?.get_child(name)
    }

    /// Children of an entity in attachment order
    pub fn children(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.get(id).into_iter().flat_map(Entity::children)
    }

    /// Parent of an entity
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id)?.parent()
    }

    /// Whether the entity itself is flagged active
    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(Entity::is_active)
    }

    /// Whether the entity is attached to the root through active entities only
    pub fn is_active_in_tree(&self, id: EntityId) -> bool {
        let mut current = id;
        while current != self.root {
            match self.entities.get(current) {
                Some(entity) if entity.is_active() => match entity.parent() {
                    Some(parent) => current = parent,
                    None => return false,
                },
                _ => return false,
            }
        }
        true
    }

    /// Activate or deactivate an entity and, through enumeration, its subtree
    pub fn set_active(&mut self, id: EntityId, active: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.set_active(active);
        Ok(())
    }

    /// Free a detached entity and its whole subtree
    pub fn destroy(&mut self, id: EntityId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::CannotRemoveRoot);
        }
        if self.node(id)?.parent().is_some() {
            return Err(SceneError::NotDetached(id));
        }

        let mut freed = 0usize;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(entity) = self.entities.remove(next) {
                stack.extend(entity.children());
                freed += 1;
            }
        }
        log::trace!("Destroyed {} entities", freed);
        Ok(())
    }

    /// Detach an entity from its parent (if any) and destroy it
    pub fn despawn(&mut self, id: EntityId) -> Result<(), SceneError> {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id)?;
        }
        self.destroy(id)
    }

    /// Slash-separated names from the root, for diagnostics
    pub fn path(&self, id: EntityId) -> String {
        if id == self.root {
            return "/".to_string();
        }
        let mut names = Vec::new();
        let mut cursor = id;
        while let Some(parent) = self.parent(cursor) {
            names.push(
                self.entities
                    .get(parent)
                    .and_then(|p| p.child_name(cursor))
                    .unwrap_or("?")
                    .to_string(),
            );
            cursor = parent;
        }
        if cursor != self.root {
            names.push("<detached>".to_string());
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    // ---- construction ----

    /// Build a subtree from `desc` and attach it under `parent` as `name`.
    ///
    /// Setup of the new components runs after the whole subtree exists. On
    /// failure nothing of the subtree is left in the scene.
    pub fn create_child(&mut self, desc: &EntityDesc, name: &str, parent: EntityId) -> Result<EntityId, SceneError> {
        let id = self.spawn();
        if let Err(err) = self.add_child(parent, name, id) {
            self.entities.remove(id);
            return Err(err);
        }

        let mut pending = Vec::new();
        let built = self
            .populate(id, desc, &mut pending)
            .and_then(|()| self.setup_pending(pending));

        match built {
            Ok(()) => Ok(id),
            Err(err) => {
                log::error!("Failed to create '{}': {}", name, err);
                if self.contains(id) {
                    if let Err(cleanup) = self.despawn(id) {
                        log::warn!("Could not discard partial subtree '{}': {}", name, cleanup);
                    }
                }
                Err(err)
            }
        }
    }

    fn create_children<'d>(
        &mut self,
        children: &'d SceneDesc,
        parent: EntityId,
        pending: &mut PendingSetup<'d>,
    ) -> Result<(), SceneError> {
        for (name, desc) in children.iter() {
            let child = self.spawn();
            self.add_child(parent, name, child)?;
            self.populate(child, desc, pending)?;
        }
        Ok(())
    }

    fn populate<'d>(
        &mut self,
        id: EntityId,
        desc: &'d EntityDesc,
        pending: &mut PendingSetup<'d>,
    ) -> Result<(), SceneError> {
        self.create_children(&desc.children, id, pending)?;
        for (kind, component_desc) in desc.components.iter() {
            let handle = self.add_component(id, kind, component_desc, true)?;
            pending.push((handle, component_desc));
        }
        Ok(())
    }

    fn setup_pending(&mut self, pending: PendingSetup<'_>) -> Result<(), SceneError> {
        for (handle, desc) in pending {
            self.with_component(handle, |component, ctx| component.setup(ctx, desc))?;
        }
        Ok(())
    }

    // ---- components ----

    /// Construct a component by type name and attach it.
    ///
    /// `create` runs immediately; `setup` runs too unless `deferred` is set.
    /// A component of the same type already on the entity is replaced.
    pub fn add_component(
        &mut self,
        entity: EntityId,
        kind: &str,
        desc: &ComponentDesc,
        deferred: bool,
    ) -> Result<ComponentHandle, SceneError> {
        self.node(entity)?;
        let (kind, mut instance) = self.factory.create(kind)?;
        instance.create(desc)?;
        let handle = self.attach(entity, kind, instance)?;
        if !deferred {
            self.with_component(handle, |component, ctx| component.setup(ctx, desc))?;
        }
        Ok(handle)
    }

    /// Attach an already built component without running any lifecycle hook
    pub fn insert_component<T: ComponentKind>(
        &mut self,
        entity: EntityId,
        component: T,
    ) -> Result<ComponentHandle, SceneError> {
        self.attach(entity, T::TYPE_NAME, Box::new(component))
    }

    fn attach(
        &mut self,
        entity: EntityId,
        kind: &'static str,
        instance: Box<dyn Component>,
    ) -> Result<ComponentHandle, SceneError> {
        let serial = self.next_serial;
        self.next_serial += 1;
        let node = self.node_mut(entity)?;
        if node.has_component(kind) {
            log::debug!("Replacing {} component", kind);
        }
        node.put_slot(ComponentSlot::new(kind, instance, serial));
        Ok(ComponentHandle::new(entity, kind))
    }

    /// Typed access to a component
    pub fn get<T: ComponentKind>(&self, entity: EntityId) -> Option<&T> {
        self.entities
            .get(entity)?
            .slot(T::TYPE_NAME)?
            .instance
            .as_deref()?
            .as_any()
            .downcast_ref()
    }

    /// Typed mutable access to a component
    pub fn get_mut<T: ComponentKind>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.entities
            .get_mut(entity)?
            .slot_mut(T::TYPE_NAME)?
            .instance
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut()
    }

    /// Untyped access to a component; `None` while it is executing
    pub fn component(&self, handle: ComponentHandle) -> Option<&dyn Component> {
        self.entities
            .get(handle.entity)?
            .slot(handle.kind)?
            .instance
            .as_deref()
    }

    /// Handle for a component of type `kind` on `entity`
    pub fn handle_of(&self, entity: EntityId, kind: &str) -> Option<ComponentHandle> {
        let slot = self.entities.get(entity)?.slot(kind)?;
        Some(ComponentHandle::new(entity, slot.kind))
    }

    /// Handles of every component on an entity, in insertion order
    pub fn components_of(&self, entity: EntityId) -> Vec<ComponentHandle> {
        self.entities.get(entity).map_or_else(Vec::new, |node| {
            node.component_kinds()
                .map(|kind| ComponentHandle::new(entity, kind))
                .collect()
        })
    }

    /// Enabled flag of a component; `false` if it does not exist
    pub fn is_enabled(&self, handle: ComponentHandle) -> bool {
        self.entities
            .get(handle.entity)
            .and_then(|node| node.is_component_enabled(handle.kind))
            .unwrap_or(false)
    }

    /// Change a component's enabled flag.
    ///
    /// Setting the current value does nothing. Otherwise `on_enabled` or
    /// `on_disabled` runs; if the component is executing, the hook runs when
    /// its call returns.
    pub fn set_enabled(&mut self, handle: ComponentHandle, enabled: bool) -> Result<(), SceneError> {
        let slot = self
            .node_mut(handle.entity)?
            .slot_mut(handle.kind)
            .ok_or_else(|| SceneError::MissingComponent {
                entity: handle.entity,
                kind: handle.kind.to_string(),
            })?;

        if slot.enabled == enabled {
            return Ok(());
        }
        slot.enabled = enabled;

        if slot.instance.is_none() {
            slot.pending_hooks.push(enabled);
            return Ok(());
        }

        self.with_component(handle, |component, ctx| {
            if enabled {
                component.on_enabled(ctx)
            } else {
                component.on_disabled(ctx)
            }
        })?;
        Ok(())
    }

    /// Call into a component with mutable access to the rest of the scene.
    ///
    /// The component is taken out of its slot for the duration of `f` and
    /// put back afterwards, unless the entity was destroyed or the component
    /// replaced in the meantime. Returns `Ok(None)` when the component does
    /// not exist or is already executing.
    pub fn with_component<R>(
        &mut self,
        handle: ComponentHandle,
        f: impl FnOnce(&mut dyn Component, &mut ComponentContext<'_>) -> Result<R, SceneError>,
    ) -> Result<Option<R>, SceneError> {
        let Some((mut instance, serial)) = self.take_instance(handle) else {
            return Ok(None);
        };

        let result = f(instance.as_mut(), &mut ComponentContext::new(self, handle));
        let restored = self.restore_instance(handle, instance, serial);

        let value = result?;
        restored?;
        Ok(Some(value))
    }

    /// Typed form of [`with_component`](Self::with_component) for the `T`
    /// component of `entity`
    pub fn with_typed<T: ComponentKind, R>(
        &mut self,
        entity: EntityId,
        f: impl FnOnce(&mut T, &mut ComponentContext<'_>) -> Result<R, SceneError>,
    ) -> Result<Option<R>, SceneError> {
        self.with_component(ComponentHandle::new(entity, T::TYPE_NAME), |component, ctx| {
            match component.as_any_mut().downcast_mut::<T>() {
                Some(typed) => f(typed, ctx),
                None => Err(SceneError::Component(format!(
                    "{} is registered under another type",
                    T::TYPE_NAME
                ))),
            }
        })
    }

    fn take_instance(&mut self, handle: ComponentHandle) -> Option<(Box<dyn Component>, u64)> {
        let slot = self.entities.get_mut(handle.entity)?.slot_mut(handle.kind)?;
        let instance = slot.instance.take()?;
        Some((instance, slot.serial))
    }

    fn live_slot_mut(&mut self, handle: ComponentHandle, serial: u64) -> Option<&mut ComponentSlot> {
        self.entities
            .get_mut(handle.entity)?
            .slot_mut(handle.kind)
            .filter(|slot| slot.serial == serial)
    }

    /// Put a component back, first running hooks deferred while it executed
    fn restore_instance(
        &mut self,
        handle: ComponentHandle,
        mut instance: Box<dyn Component>,
        serial: u64,
    ) -> Result<(), SceneError> {
        let mut result = Ok(());
        loop {
            let Some(slot) = self.live_slot_mut(handle, serial) else {
                log::trace!("{} left the scene while executing", handle.kind);
                return result;
            };
            if slot.pending_hooks.is_empty() {
                slot.instance = Some(instance);
                return result;
            }

            let enabled = slot.pending_hooks.remove(0);
            let mut ctx = ComponentContext::new(self, handle);
            let hook = if enabled {
                instance.on_enabled(&mut ctx)
            } else {
                instance.on_disabled(&mut ctx)
            };
            if result.is_ok() {
                result = hook;
            }
        }
    }

    // ---- lookup ----

    /// Find an entity by name anywhere below the root.
    ///
    /// Each level checks its own direct children first, then searches each
    /// child's subtree in attachment order; the first match wins.
    pub fn find_object(&self, name: &str) -> Option<EntityId> {
        self.find_below(self.root, name)
    }

    fn find_below(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        let node = self.entities.get(parent)?;
        node.get_child(name)
            .or_else(|| node.children().find_map(|child| self.find_below(child, name)))
    }

    /// Depth-first, pre-order enumeration of the tree, root excluded.
    ///
    /// With `only_active`, an inactive entity is skipped along with its
    /// whole subtree.
    pub fn entities(&self, only_active: bool) -> Entities<'_> {
        let mut stack = Vec::new();
        if let Some(root) = self.entities.get(self.root) {
            if !only_active || root.is_active() {
                stack.extend(root.children().rev());
            }
        }
        Entities {
            scene: self,
            stack,
            only_active,
        }
    }

    /// Resolve an `"entity.Type"` reference
    pub fn resolve_reference(&self, reference: &str) -> Result<ComponentHandle, SceneError> {
        let unresolved = || SceneError::UnresolvedReference(reference.to_string());
        let (entity_name, kind) = reference.split_once('.').ok_or_else(unresolved)?;
        let entity = self.find_object(entity_name).ok_or_else(unresolved)?;
        self.handle_of(entity, kind).ok_or_else(unresolved)
    }

    /// Resolve a handler reference into a target and a method name.
    ///
    /// `"Type.method"` targets a component on `owner`;
    /// `"entity.Type.method"` looks the entity up in the scene.
    pub fn resolve_method(&self, owner: EntityId, reference: &str) -> Result<(ComponentHandle, String), SceneError> {
        let unresolved = || SceneError::UnresolvedReference(reference.to_string());
        let (target, method) = reference.rsplit_once('.').ok_or_else(unresolved)?;
        let handle = if target.contains('.') {
            self.resolve_reference(target)?
        } else {
            self.handle_of(owner, target).ok_or_else(unresolved)?
        };
        Ok((handle, method.to_string()))
    }

    // ---- events ----

    /// Fire a trigger whose handlers target components
    pub fn dispatch(&mut self, trigger: &EventTrigger<ComponentHandle>, args: &[EventArg]) -> Result<(), SceneError> {
        trigger.trigger(args, |target, method, call_args| self.deliver(*target, method, call_args))
    }

    /// Deliver one event call to a component.
    ///
    /// `enable` is understood by every component and sets its enabled flag
    /// from the last boolean argument. Other methods go to the component's
    /// [`EventReceiver`](super::component::EventReceiver).
    pub fn deliver(&mut self, target: ComponentHandle, method: &str, args: &[EventArg]) -> Result<(), SceneError> {
        if method == "enable" {
            let enabled = args
                .iter()
                .rev()
                .find_map(EventArg::as_bool)
                .ok_or_else(|| SceneError::Component(format!("{}.enable needs a boolean argument", target.kind)))?;
            return self.set_enabled(target, enabled);
        }

        let delivered = self.with_component(target, |component, ctx| match component.as_event_receiver() {
            Some(receiver) => receiver.on_event(ctx, method, args),
            None => Err(SceneError::MissingCapability {
                kind: target.kind.to_string(),
                capability: "event receiver",
            }),
        })?;

        delivered.ok_or_else(|| SceneError::MissingComponent {
            entity: target.entity,
            kind: target.kind.to_string(),
        })
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("entities", &self.len())
            .field("factory", &self.factory)
            .finish()
    }
}

/// Iterator returned by [`Scene::entities`]
pub struct Entities<'a> {
    scene: &'a Scene,
    stack: Vec<EntityId>,
    only_active: bool,
}

impl Iterator for Entities<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        while let Some(id) = self.stack.pop() {
            let Some(entity) = self.scene.entities.get(id) else {
                continue;
            };
            if self.only_active && !entity.is_active() {
                continue;
            }
            self.stack.extend(entity.children().rev());
            return Some(id);
        }
        None
    }
}
