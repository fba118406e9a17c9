//! Enabler component
//!
//! Switches other components on or off: once at setup (`onStart`) and every
//! time it receives `onEvent`. Targets are `"entity.Type"` references.

use serde::Deserialize;

use crate::ecs::component::{
    parse_desc, Component, ComponentContext, ComponentDesc, ComponentHandle, ComponentKind, EventReceiver,
};
use crate::ecs::SceneError;
use crate::events::{EventArg, EventTrigger};
use crate::foundation::collections::OrderedMap;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EnablerDesc {
    on_start: OrderedMap<bool>,
    on_event: OrderedMap<bool>,
}

/// Enables or disables components at start and on demand
#[derive(Debug, Default)]
pub struct Enabler {
    targets: EventTrigger<ComponentHandle>,
}

impl Component for Enabler {
    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: EnablerDesc = parse_desc(Self::TYPE_NAME, desc)?;

        for (reference, enabled) in desc.on_start.iter() {
            let target = ctx.find_component(reference)?;
            ctx.scene.set_enabled(target, *enabled)?;
        }

        for (reference, enabled) in desc.on_event.iter() {
            let target = ctx.find_component(reference)?;
            self.targets
                .add_with(target, "enable", None, Some(EventArg::Bool(*enabled)));
        }
        Ok(())
    }

    fn as_event_receiver(&mut self) -> Option<&mut dyn EventReceiver> {
        Some(self)
    }
}

impl EventReceiver for Enabler {
    fn on_event(&mut self, ctx: &mut ComponentContext<'_>, method: &str, _args: &[EventArg]) -> Result<(), SceneError> {
        match method {
            "onEvent" => ctx.scene.dispatch(&self.targets, &[]),
            other => Err(SceneError::Component(format!("Enabler has no event '{other}'"))),
        }
    }
}

impl ComponentKind for Enabler {
    const TYPE_NAME: &'static str = "Enabler";
}

impl Enabler {
    /// Components switched by `onEvent`
    pub fn targets(&self) -> &EventTrigger<ComponentHandle> {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Position;
    use crate::ecs::{ComponentFactory, Scene};
    use std::sync::Arc;

    fn build() -> Scene {
        let desc = ron::from_str(
            r#"{
                "switch": { "components": {
                    "Enabler": {
                        "onStart": { "lamp.Position": false },
                        "onEvent": { "lamp.Position": true, "other.Position": false },
                    },
                } },
                "lamp": { "components": { "Position": () } },
                "other": { "components": { "Position": () } },
            }"#,
        )
        .unwrap();
        Scene::create(Arc::new(ComponentFactory::with_engine_components()), &desc).unwrap()
    }

    #[test]
    fn test_on_start_applies_during_setup() {
        let scene = build();
        let lamp = scene.find_object("lamp").unwrap();
        let other = scene.find_object("other").unwrap();
        assert!(!scene.is_enabled(scene.handle_of(lamp, Position::TYPE_NAME).unwrap()));
        assert!(scene.is_enabled(scene.handle_of(other, Position::TYPE_NAME).unwrap()));
    }

    #[test]
    fn test_on_event_dispatches_targets() {
        let mut scene = build();
        let switch = scene.find_object("switch").unwrap();
        let lamp = scene.handle_of(scene.find_object("lamp").unwrap(), "Position").unwrap();
        let other = scene.handle_of(scene.find_object("other").unwrap(), "Position").unwrap();

        let enabler = scene.handle_of(switch, Enabler::TYPE_NAME).unwrap();
        scene.deliver(enabler, "onEvent", &[]).unwrap();

        assert!(scene.is_enabled(lamp));
        assert!(!scene.is_enabled(other));
        assert_eq!(scene.get::<Enabler>(switch).unwrap().targets().len(), 2);
    }

    #[test]
    fn test_unknown_event_is_an_error() {
        let mut scene = build();
        let switch = scene.find_object("switch").unwrap();
        let enabler = scene.handle_of(switch, Enabler::TYPE_NAME).unwrap();
        assert!(matches!(
            scene.deliver(enabler, "explode", &[]),
            Err(SceneError::Component(_))
        ));
    }
}
