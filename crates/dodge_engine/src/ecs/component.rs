//! Component trait and capabilities
//!
//! A component is a boxed trait object stored on an entity under its type
//! name. Besides the lifecycle hooks on [`Component`], a component joins a
//! system pass by implementing a capability trait and returning itself from
//! the matching `as_*` accessor.
//!
//! Lifecycle:
//! 1. `create(desc)` right after construction. Siblings may not exist yet.
//! 2. `setup(ctx, desc)` once the whole construction batch exists, so
//!    references to other entities and components resolve.
//! 3. `on_enabled` / `on_disabled` whenever the enabled flag actually changes.

use std::any::Any;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

use super::{EntityId, Scene, SceneError};
use crate::events::EventArg;
use crate::foundation::time::Timing;
use crate::render::Surface;

/// Free-form descriptor data handed to `create` and `setup`
pub type ComponentDesc = ron::Value;

/// Upcast to [`Any`] for downcasting trait objects
pub trait AsAny: 'static {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior or data attached to exactly one entity
#[allow(unused_variables)]
pub trait Component: AsAny {
    /// Read the descriptor. Other components of the batch may not exist yet.
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        Ok(())
    }

    /// Resolve references once the construction batch is complete
    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called when the component goes from disabled to enabled
    fn on_enabled(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called when the component goes from enabled to disabled
    fn on_disabled(&mut self, ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Logic pass participation
    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        None
    }

    /// Display pass participation
    fn as_display(&mut self) -> Option<&mut dyn DisplayComponent> {
        None
    }

    /// Camera pass participation
    fn as_camera(&mut self) -> Option<&mut dyn CameraComponent> {
        None
    }

    /// Collision notifications
    fn as_collision_handler(&mut self) -> Option<&mut dyn CollisionHandler> {
        None
    }

    /// Named event delivery
    fn as_event_receiver(&mut self) -> Option<&mut dyn EventReceiver> {
        None
    }
}

/// Component type with a registered name and a default constructor
pub trait ComponentKind: Component + Default {
    /// Name used in scene descriptions and for lookup
    const TYPE_NAME: &'static str;
}

/// Per-frame update, run by the logic system
pub trait LogicComponent {
    /// Advance one frame
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> Result<(), SceneError>;
}

/// Scene geometry submission, run by the display system
pub trait DisplayComponent {
    /// Draw onto the surface
    fn display(&mut self, ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, dt: f32) -> Result<(), SceneError>;
}

/// Compositing, run by the display system after every display component
pub trait CameraComponent {
    /// Composite and present the frame
    fn render(&mut self, ctx: &mut ComponentContext<'_>, surface: &mut dyn Surface, dt: f32) -> Result<(), SceneError>;
}

/// Receiver of collision notifications from a collider
pub trait CollisionHandler {
    /// `other` is the collider this one overlapped
    fn on_collision(&mut self, ctx: &mut ComponentContext<'_>, other: ComponentHandle) -> Result<(), SceneError>;
}

/// Receiver of named events from an event trigger
pub trait EventReceiver {
    /// Handle `method` with the trigger arguments
    fn on_event(&mut self, ctx: &mut ComponentContext<'_>, method: &str, args: &[EventArg]) -> Result<(), SceneError>;
}

/// Resolved reference to a component: owner plus type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    /// Owning entity
    pub entity: EntityId,
    /// Component type name
    pub kind: &'static str,
}

impl ComponentHandle {
    /// Create a handle
    pub const fn new(entity: EntityId, kind: &'static str) -> Self {
        Self { entity, kind }
    }
}

/// What a component sees while one of its methods runs
pub struct ComponentContext<'a> {
    /// The scene, with the running component taken out of it
    pub scene: &'a mut Scene,
    handle: ComponentHandle,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(scene: &'a mut Scene, handle: ComponentHandle) -> Self {
        Self { scene, handle }
    }

    /// Entity owning the running component
    pub fn owner(&self) -> EntityId {
        self.handle.entity
    }

    /// Handle of the running component
    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    /// Typed access to a sibling component on the owner
    pub fn sibling<T: ComponentKind>(&self) -> Option<&T> {
        self.scene.get::<T>(self.handle.entity)
    }

    /// Typed mutable access to a sibling component on the owner
    pub fn sibling_mut<T: ComponentKind>(&mut self) -> Option<&mut T> {
        self.scene.get_mut::<T>(self.handle.entity)
    }

    /// Resolve `"entity.Type"` against the scene
    pub fn find_component(&self, reference: &str) -> Result<ComponentHandle, SceneError> {
        self.scene.resolve_reference(reference)
    }

    /// Enable or disable the running component.
    ///
    /// The hook runs once the current call returns.
    pub fn set_self_enabled(&mut self, enabled: bool) -> Result<(), SceneError> {
        self.scene.set_enabled(self.handle, enabled)
    }
}

/// Deserialize a descriptor into a typed value.
///
/// A unit descriptor (`()`) is read as an empty map so that types whose
/// fields all have defaults accept it.
pub fn parse_desc<T: DeserializeOwned>(kind: &str, desc: &ComponentDesc) -> Result<T, SceneError> {
    let value = match desc {
        ron::Value::Unit => ron::Value::Map(ron::Map::new()),
        other => other.clone(),
    };
    value.into_rust().map_err(|e| SceneError::InvalidDescriptor {
        kind: kind.to_string(),
        message: e.to_string(),
    })
}

/// Read an optional cross-reference field.
///
/// Accepts a plain string (`"handler": "Player"`) as well as `Some("Player")`
/// and `None`. Use with `#[serde(deserialize_with = "desc_reference")]`.
pub fn desc_reference<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match ron::Value::deserialize(deserializer)? {
        ron::Value::String(reference) => Ok(Some(reference)),
        ron::Value::Option(Some(inner)) => match *inner {
            ron::Value::String(reference) => Ok(Some(reference)),
            other => Err(D::Error::custom(format!("expected a reference string, found {other:?}"))),
        },
        ron::Value::Option(None) | ron::Value::Unit => Ok(None),
        other => Err(D::Error::custom(format!("expected a reference string, found {other:?}"))),
    }
}

/// Descriptor holding a single number
pub fn desc_number(value: f32) -> ComponentDesc {
    ron::Value::Number(f64::from(value).into())
}

/// Set `key` on a map descriptor. A unit descriptor becomes a map first.
pub fn desc_insert(desc: &mut ComponentDesc, key: &str, value: ComponentDesc) -> Result<(), SceneError> {
    if matches!(desc, ron::Value::Unit) {
        *desc = ron::Value::Map(ron::Map::new());
    }
    match desc {
        ron::Value::Map(map) => {
            map.insert(ron::Value::String(key.to_string()), value);
            Ok(())
        }
        _ => Err(SceneError::InvalidDescriptor {
            kind: key.to_string(),
            message: "descriptor is not a map".to_string(),
        }),
    }
}

/// Descriptor map built from `(key, value)` pairs
pub fn desc_map<'k>(entries: impl IntoIterator<Item = (&'k str, ComponentDesc)>) -> ComponentDesc {
    let mut map = ron::Map::new();
    for (key, value) in entries {
        map.insert(ron::Value::String(key.to_string()), value);
    }
    ron::Value::Map(map)
}
