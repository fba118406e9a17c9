//! Collider component
//!
//! An axis-aligned box centred on the owner's world position, tagged with
//! collision layers. The optional handler names a sibling component that is
//! told about every collision.

use serde::Deserialize;

use crate::ecs::component::{desc_reference, parse_desc, Component, ComponentContext, ComponentDesc, ComponentHandle, ComponentKind};
use crate::ecs::components::Position;
use crate::ecs::{EntityId, Scene, SceneError};
use crate::physics::CollisionLayers;
use crate::spatial::Rectangle;

/// Width and height of a collision box
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Size {
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColliderDesc {
    flag: CollisionLayers,
    mask: CollisionLayers,
    size: Size,
    #[serde(deserialize_with = "desc_reference")]
    handler: Option<String>,
}

/// Collision box with layer filtering
#[derive(Debug, Clone, Default)]
pub struct Collider {
    /// Layers this collider belongs to
    pub flag: CollisionLayers,
    /// Layers this collider reacts to
    pub mask: CollisionLayers,
    /// Box size
    pub size: Size,
    handler_kind: Option<String>,
    handler: Option<ComponentHandle>,
}

impl Component for Collider {
    fn create(&mut self, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: ColliderDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.flag = desc.flag;
        self.mask = desc.mask;
        self.size = desc.size;
        self.handler_kind = desc.handler;
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> Result<(), SceneError> {
        let Some(kind) = self.handler_kind.as_deref() else {
            return Ok(());
        };

        let handle = ctx
            .scene
            .handle_of(ctx.owner(), kind)
            .ok_or_else(|| SceneError::UnresolvedReference(kind.to_string()))?;

        let capable = ctx
            .scene
            .with_component(handle, |component, _| Ok(component.as_collision_handler().is_some()))?
            .unwrap_or(false);
        if !capable {
            return Err(SceneError::MissingCapability {
                kind: kind.to_string(),
                capability: "collision handler",
            });
        }

        self.handler = Some(handle);
        Ok(())
    }
}

impl ComponentKind for Collider {
    const TYPE_NAME: &'static str = "Collider";
}

impl Collider {
    /// Create a collider without a handler
    pub fn new(flag: CollisionLayers, mask: CollisionLayers, w: f32, h: f32) -> Self {
        Self {
            flag,
            mask,
            size: Size { w, h },
            handler_kind: None,
            handler: None,
        }
    }

    /// Builder: notify `handler` of collisions
    #[must_use]
    pub fn with_handler(mut self, handler: ComponentHandle) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Component told about collisions, if any
    pub fn handler(&self) -> Option<ComponentHandle> {
        self.handler
    }

    /// Current world-space box of the collider owned by `owner`.
    ///
    /// Fails when the owner has no Position.
    pub fn area(&self, scene: &Scene, owner: EntityId) -> Result<Rectangle, SceneError> {
        let center = Position::world_position(scene, owner)?;
        Ok(Rectangle::from_center(center.x, center.y, self.size.w, self.size.h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::CollisionHandler;
    use crate::ecs::ComponentFactory;
    use std::sync::Arc;

    #[derive(Default)]
    struct Bumper;

    impl Component for Bumper {
        fn as_collision_handler(&mut self) -> Option<&mut dyn CollisionHandler> {
            Some(self)
        }
    }

    impl CollisionHandler for Bumper {
        fn on_collision(&mut self, _ctx: &mut ComponentContext<'_>, _other: ComponentHandle) -> Result<(), SceneError> {
            Ok(())
        }
    }

    impl ComponentKind for Bumper {
        const TYPE_NAME: &'static str = "Bumper";
    }

    fn factory() -> Arc<ComponentFactory> {
        Arc::new(ComponentFactory::with_engine_components().with::<Bumper>())
    }

    fn build(text: &str) -> Result<Scene, SceneError> {
        Scene::create(factory(), &ron::from_str(text).unwrap())
    }

    #[test]
    fn test_area_centred_on_world_position() {
        let scene = build(
            r#"{
                "box": { "components": {
                    "Position": { "x": 10, "y": 20 },
                    "Collider": { "flag": 1, "mask": 2, "size": { "w": 4, "h": 6 } },
                } },
            }"#,
        )
        .unwrap();
        let entity = scene.find_object("box").unwrap();
        let collider = scene.get::<Collider>(entity).unwrap();
        assert_eq!(collider.flag, CollisionLayers::from_raw(1));
        assert_eq!(collider.mask, CollisionLayers::from_raw(2));
        assert_eq!(
            collider.area(&scene, entity).unwrap(),
            Rectangle::new(8.0, 12.0, 17.0, 23.0)
        );
    }

    #[test]
    fn test_handler_resolves_to_sibling() {
        let scene = build(
            r#"{
                "box": { "components": {
                    "Position": (),
                    "Collider": { "flag": 1, "mask": 1, "size": { "w": 1, "h": 1 }, "handler": "Bumper" },
                    "Bumper": (),
                } },
            }"#,
        )
        .unwrap();
        let entity = scene.find_object("box").unwrap();
        let handler = scene.get::<Collider>(entity).unwrap().handler().unwrap();
        assert_eq!(handler, ComponentHandle::new(entity, "Bumper"));
    }

    #[test]
    fn test_wrapped_handler_reference_is_accepted() {
        let scene = build(
            r#"{
                "box": { "components": {
                    "Position": (),
                    "Collider": { "size": { "w": 1, "h": 1 }, "handler": Some("Bumper") },
                    "Bumper": (),
                } },
            }"#,
        )
        .unwrap();
        let entity = scene.find_object("box").unwrap();
        assert!(scene.get::<Collider>(entity).unwrap().handler().is_some());
    }

    #[test]
    fn test_missing_handler_is_unresolved() {
        let err = build(
            r#"{ "box": { "components": {
                "Collider": { "size": { "w": 1, "h": 1 }, "handler": Some("Bumper") },
            } } }"#,
        )
        .unwrap_err();
        assert_eq!(err, SceneError::UnresolvedReference("Bumper".to_string()));
    }

    #[test]
    fn test_handler_without_capability_is_rejected() {
        let err = build(
            r#"{ "box": { "components": {
                "Position": (),
                "Collider": { "size": { "w": 1, "h": 1 }, "handler": Some("Position") },
            } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::MissingCapability { ref kind, .. } if kind == "Position"));
    }

    #[test]
    fn test_area_without_position_fails() {
        let mut scene = Scene::new(factory());
        let entity = scene.spawn();
        let collider = Collider::new(CollisionLayers::from_raw(1), CollisionLayers::from_raw(1), 1.0, 1.0);
        assert!(matches!(
            collider.area(&scene, entity),
            Err(SceneError::MissingComponent { .. })
        ));
    }
}
