//! Cross-module scenarios for the scene graph and the systems

mod scene_scenarios;

use std::sync::Arc;

use crate::ecs::{
    CollisionHandler, Component, ComponentContext, ComponentFactory, ComponentHandle, ComponentKind, EventReceiver,
    Scene, SceneDesc, SceneError,
};
use crate::events::EventArg;

/// Records everything delivered to it
#[derive(Debug, Default)]
pub(super) struct Probe {
    pub hits: Vec<ComponentHandle>,
    pub events: Vec<(String, Vec<EventArg>)>,
}

impl Component for Probe {
    fn as_collision_handler(&mut self) -> Option<&mut dyn CollisionHandler> {
        Some(self)
    }

    fn as_event_receiver(&mut self) -> Option<&mut dyn EventReceiver> {
        Some(self)
    }
}

impl CollisionHandler for Probe {
    fn on_collision(&mut self, _ctx: &mut ComponentContext<'_>, other: ComponentHandle) -> Result<(), SceneError> {
        self.hits.push(other);
        Ok(())
    }
}

impl EventReceiver for Probe {
    fn on_event(&mut self, _ctx: &mut ComponentContext<'_>, method: &str, args: &[EventArg]) -> Result<(), SceneError> {
        self.events.push((method.to_string(), args.to_vec()));
        Ok(())
    }
}

impl ComponentKind for Probe {
    const TYPE_NAME: &'static str = "Probe";
}

pub(super) fn factory() -> ComponentFactory {
    ComponentFactory::with_engine_components().with::<Probe>()
}

pub(super) fn parse(text: &str) -> SceneDesc {
    ron::from_str(text).unwrap()
}

pub(super) fn build(factory: ComponentFactory, text: &str) -> Scene {
    Scene::create(Arc::new(factory), &parse(text)).unwrap()
}

pub(super) fn probe<'s>(scene: &'s Scene, name: &str) -> &'s Probe {
    let entity = scene.find_object(name).unwrap();
    scene.get::<Probe>(entity).unwrap()
}

pub(super) fn collider_of(scene: &Scene, name: &str) -> ComponentHandle {
    let entity = scene.find_object(name).unwrap();
    scene.handle_of(entity, "Collider").unwrap()
}
