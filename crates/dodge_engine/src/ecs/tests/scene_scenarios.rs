//! Scene construction, enumeration and event scenarios

use super::{build, factory, parse, probe, Probe};
use crate::ecs::systems::LogicSystem;
use crate::ecs::{
    Component, ComponentContext, ComponentDesc, ComponentHandle, ComponentKind, EntityDesc, LogicComponent,
    SceneError, System,
};
use crate::ecs::component::parse_desc;
use crate::events::{EventArg, EventTrigger};
use crate::foundation::time::Timing;
use serde::Deserialize;

/// Resolves a reference during setup and remembers the result
#[derive(Debug, Default)]
struct Linker {
    target: Option<ComponentHandle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LinkerDesc {
    target: String,
}

impl Component for Linker {
    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> Result<(), SceneError> {
        let desc: LinkerDesc = parse_desc(Self::TYPE_NAME, desc)?;
        self.target = Some(ctx.find_component(&desc.target)?);
        Ok(())
    }
}

impl ComponentKind for Linker {
    const TYPE_NAME: &'static str = "Linker";
}

/// Disables itself from inside its own update
#[derive(Debug, Default)]
struct Toggler {
    updates: u32,
    disabled_hooks: u32,
    hooks_seen_in_update: u32,
}

impl Component for Toggler {
    fn on_disabled(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<(), SceneError> {
        self.disabled_hooks += 1;
        Ok(())
    }

    fn as_logic(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Toggler {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _timing: &Timing) -> Result<(), SceneError> {
        self.updates += 1;
        ctx.set_self_enabled(false)?;
        self.hooks_seen_in_update = self.disabled_hooks;
        Ok(())
    }
}

impl ComponentKind for Toggler {
    const TYPE_NAME: &'static str = "Toggler";
}

#[test]
fn test_children_follow_document_order() {
    let scene = build(
        factory(),
        r#"{
            "zeta": (),
            "alpha": { "children": { "b": (), "a": (), "c": () } },
            "mid": (),
        }"#,
    );
    let root = scene.root();
    let names: Vec<_> = scene
        .children(root)
        .map(|child| scene.entity(root).unwrap().child_name(child).unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);

    let alpha = scene.find_object("alpha").unwrap();
    let inner: Vec<_> = scene.children(alpha).collect();
    assert_eq!(
        inner,
        vec![
            scene.get_child(alpha, "b").unwrap(),
            scene.get_child(alpha, "a").unwrap(),
            scene.get_child(alpha, "c").unwrap(),
        ]
    );
}

#[test]
fn test_entities_prune_inactive_subtrees() {
    let mut scene = build(
        factory(),
        r#"{
            "a": { "children": { "b": { "children": { "c": () } } } },
            "d": (),
        }"#,
    );
    let [a, b, c, d] = ["a", "b", "c", "d"].map(|name| scene.find_object(name).unwrap());

    assert_eq!(scene.entities(true).collect::<Vec<_>>(), vec![a, b, c, d]);

    scene.set_active(b, false).unwrap();
    assert!(scene.is_active(c));
    assert!(!scene.is_active_in_tree(c));
    assert!(scene.is_active_in_tree(d));
    assert_eq!(scene.entities(true).collect::<Vec<_>>(), vec![a, d]);
    assert_eq!(scene.entities(false).collect::<Vec<_>>(), vec![a, b, c, d]);
}

#[test]
fn test_setup_resolves_references_declared_later_in_batch() {
    let factory = factory().with::<Linker>();
    let scene = build(
        factory,
        r#"{
            "left": { "children": {
                "seeker": { "components": { "Linker": { "target": "cousin.Position" } } },
            } },
            "right": { "children": {
                "cousin": { "components": { "Position": () } },
            } },
        }"#,
    );
    let seeker = scene.find_object("seeker").unwrap();
    let cousin = scene.find_object("cousin").unwrap();
    assert_eq!(
        scene.get::<Linker>(seeker).unwrap().target,
        Some(ComponentHandle::new(cousin, "Position"))
    );
}

#[test]
fn test_create_child_resolves_siblings_of_the_new_subtree() {
    let mut scene = build(factory().with::<Linker>(), r#"{ "arena": () }"#);
    let arena = scene.find_object("arena").unwrap();
    let desc: EntityDesc = ron::from_str(
        r#"{
            "components": { "Linker": { "target": "marker.Position" } },
            "children": { "marker": { "components": { "Position": () } } },
        }"#,
    )
    .unwrap();

    let spawned = scene.create_child(&desc, "group", arena).unwrap();
    let marker = scene.get_child(spawned, "marker").unwrap();
    assert_eq!(
        scene.get::<Linker>(spawned).unwrap().target,
        Some(ComponentHandle::new(marker, "Position"))
    );
}

#[test]
fn test_template_read_from_value_keeps_document_order() {
    let mut scene = build(factory(), r#"{ "arena": () }"#);
    let arena = scene.find_object("arena").unwrap();
    let template: ron::Value = ron::from_str(
        r#"{
            "components": { "Probe": (), "Position": () },
            "children": { "b": (), "a": () },
        }"#,
    )
    .unwrap();
    let desc: EntityDesc = template.into_rust().unwrap();

    let spawned = scene.create_child(&desc, "group", arena).unwrap();
    let kinds: Vec<_> = scene.components_of(spawned).iter().map(|handle| handle.kind).collect();
    assert_eq!(kinds, vec!["Probe", "Position"]);
    let children: Vec<_> = scene.children(spawned).collect();
    assert_eq!(
        children,
        vec![scene.get_child(spawned, "b").unwrap(), scene.get_child(spawned, "a").unwrap()]
    );
}

#[test]
fn test_unknown_type_fails_and_leaves_no_partial_subtree() {
    let mut scene = build(factory(), r#"{ "arena": () }"#);
    let arena = scene.find_object("arena").unwrap();
    let before = scene.len();
    let desc: EntityDesc = ron::from_str(
        r#"{
            "components": { "Position": () },
            "children": { "broken": { "components": { "Teleporter": () } } },
        }"#,
    )
    .unwrap();

    let err = scene.create_child(&desc, "group", arena).unwrap_err();
    assert_eq!(err, SceneError::UnknownComponentType("Teleporter".to_string()));
    assert_eq!(scene.len(), before);
    assert!(scene.get_child(arena, "group").is_none());
    assert!(scene.find_object("broken").is_none());

    let whole = crate::ecs::Scene::create(
        std::sync::Arc::new(factory()),
        &parse(r#"{ "x": { "components": { "Nope": () } } }"#),
    );
    assert!(matches!(whole, Err(SceneError::UnknownComponentType(_))));
}

#[test]
fn test_disabling_self_defers_hook_until_update_returns() {
    let mut scene = build(
        factory().with::<Toggler>(),
        r#"{ "t": { "components": { "Toggler": () } } }"#,
    );
    let t = scene.find_object("t").unwrap();
    let mut logic = LogicSystem::new();

    logic.iterate(&mut scene, 0.016).unwrap();
    let toggler = scene.get::<Toggler>(t).unwrap();
    assert_eq!(toggler.updates, 1);
    assert_eq!(toggler.hooks_seen_in_update, 0);
    assert_eq!(toggler.disabled_hooks, 1);
    assert!(!scene.is_enabled(scene.handle_of(t, "Toggler").unwrap()));

    logic.iterate(&mut scene, 0.016).unwrap();
    assert_eq!(scene.get::<Toggler>(t).unwrap().updates, 1);
}

#[test]
fn test_set_enabled_same_value_runs_no_hook() {
    let mut scene = build(
        factory().with::<Toggler>(),
        r#"{ "t": { "components": { "Toggler": () } } }"#,
    );
    let t = scene.find_object("t").unwrap();
    let handle = scene.handle_of(t, "Toggler").unwrap();

    scene.set_enabled(handle, true).unwrap();
    scene.set_enabled(handle, false).unwrap();
    scene.set_enabled(handle, false).unwrap();
    assert_eq!(scene.get::<Toggler>(t).unwrap().disabled_hooks, 1);
}

#[test]
fn test_trigger_calls_once_then_remove_stops_it() {
    let mut scene = build(factory(), r#"{ "obj": { "components": { "Probe": () } } }"#);
    let obj = scene.find_object("obj").unwrap();
    let target = scene.handle_of(obj, "Probe").unwrap();

    let mut trigger = EventTrigger::new();
    let name = trigger.add(target, "foo");
    scene.dispatch(&trigger, &[EventArg::Int(42)]).unwrap();
    assert_eq!(
        probe(&scene, "obj").events,
        vec![("foo".to_string(), vec![EventArg::Int(42)])]
    );

    assert!(trigger.remove(&name));
    scene.dispatch(&trigger, &[EventArg::Int(43)]).unwrap();
    assert_eq!(probe(&scene, "obj").events.len(), 1);
}

#[test]
fn test_enable_event_uses_handler_context() {
    let mut scene = build(factory(), r#"{ "obj": { "components": { "Position": () } } }"#);
    let obj = scene.find_object("obj").unwrap();
    let target = scene.handle_of(obj, "Position").unwrap();

    let mut trigger = EventTrigger::new();
    trigger.add_with(target, "enable", Some("off"), Some(EventArg::Bool(false)));
    scene.dispatch(&trigger, &[EventArg::Int(1)]).unwrap();
    assert!(!scene.is_enabled(target));
}

#[test]
fn test_event_to_component_without_receiver_fails() {
    let mut scene = build(factory(), r#"{ "obj": { "components": { "Position": () } } }"#);
    let obj = scene.find_object("obj").unwrap();
    let target = scene.handle_of(obj, "Position").unwrap();
    assert!(matches!(
        scene.deliver(target, "foo", &[]),
        Err(SceneError::MissingCapability { .. })
    ));
}

#[test]
fn test_resolve_method_forms() {
    let scene = build(
        factory(),
        r#"{
            "a": { "components": { "Probe": () } },
            "b": { "components": { "Probe": () } },
        }"#,
    );
    let a = scene.find_object("a").unwrap();
    let b = scene.find_object("b").unwrap();

    let (local, method) = scene.resolve_method(a, "Probe.onHit").unwrap();
    assert_eq!(local, ComponentHandle::new(a, Probe::TYPE_NAME));
    assert_eq!(method, "onHit");

    let (remote, method) = scene.resolve_method(a, "b.Probe.onHit").unwrap();
    assert_eq!(remote, ComponentHandle::new(b, Probe::TYPE_NAME));
    assert_eq!(method, "onHit");

    assert!(matches!(
        scene.resolve_method(a, "Missing.onHit"),
        Err(SceneError::UnresolvedReference(_))
    ));
}
