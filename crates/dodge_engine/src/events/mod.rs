//! Named multi-subscriber event triggers
//!
//! An [`EventTrigger`] maps handler names to a target, a method name and an
//! optional fixed context argument. Triggering walks the handlers in
//! registration order and hands each one the trigger arguments followed by
//! its own context. Delivery is left to the caller, which knows how to reach
//! a target; for component targets see `Scene::dispatch`.

use crate::ecs::{ComponentHandle, EntityId};

/// Variant for type-safe event arguments
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
    /// Entity reference
    Entity(EntityId),
    /// Component reference
    Component(ComponentHandle),
}

impl EventArg {
    /// Boolean payload, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload as float; integers are widened
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Component payload, if any
    pub fn as_component(&self) -> Option<ComponentHandle> {
        match self {
            Self::Component(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for EventArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for EventArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for EventArg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for EventArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<ComponentHandle> for EventArg {
    fn from(v: ComponentHandle) -> Self {
        Self::Component(v)
    }
}

/// Registered handler
#[derive(Debug, Clone, PartialEq)]
pub struct EventHandler<T> {
    /// Registration name
    pub name: String,
    /// Receiver of the call
    pub target: T,
    /// Method invoked on the target
    pub method: String,
    /// Appended after the trigger arguments
    pub context: Option<EventArg>,
}

/// Named multi-subscriber dispatcher
#[derive(Debug, Clone)]
pub struct EventTrigger<T> {
    handlers: Vec<EventHandler<T>>,
    auto_index: u64,
}

impl<T> EventTrigger<T> {
    /// Create an empty trigger
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            auto_index: 0,
        }
    }

    /// Register `target.method` under an automatic name
    pub fn add(&mut self, target: T, method: impl Into<String>) -> String {
        self.add_with(target, method, None, None)
    }

    /// Register `target.method` with an optional name and fixed context.
    ///
    /// Returns the name the handler was stored under. Reusing an existing
    /// name replaces that handler and keeps its position.
    pub fn add_with(
        &mut self,
        target: T,
        method: impl Into<String>,
        name: Option<&str>,
        context: Option<EventArg>,
    ) -> String {
        let name = name.map_or_else(
            || {
                let generated = self.auto_index.to_string();
                self.auto_index += 1;
                generated
            },
            str::to_string,
        );

        let handler = EventHandler {
            name: name.clone(),
            target,
            method: method.into(),
            context,
        };

        match self.handlers.iter_mut().find(|h| h.name == name) {
            Some(existing) => *existing = handler,
            None => self.handlers.push(handler),
        }
        name
    }

    /// Remove a handler by name, returning whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.name != name);
        before != self.handlers.len()
    }

    /// Whether a handler with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.iter().any(|h| h.name == name)
    }

    /// Registered handlers in call order
    pub fn handlers(&self) -> &[EventHandler<T>] {
        &self.handlers
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Call every handler in registration order.
    ///
    /// `invoke` receives the target, the method name and the arguments with
    /// the handler's context appended. The first error stops the walk.
    pub fn trigger<E>(
        &self,
        args: &[EventArg],
        mut invoke: impl FnMut(&T, &str, &[EventArg]) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut call_args = Vec::with_capacity(args.len() + 1);
        for handler in &self.handlers {
            call_args.clear();
            call_args.extend_from_slice(args);
            if let Some(context) = &handler.context {
                call_args.push(context.clone());
            }
            invoke(&handler.target, &handler.method, &call_args)?;
        }
        Ok(())
    }
}

impl<T> Default for EventTrigger<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(usize, String, Vec<EventArg>)>,
    }

    impl Recorder {
        fn fire(&mut self, trigger: &EventTrigger<usize>, args: &[EventArg]) {
            trigger
                .trigger(args, |target, method, args| {
                    self.calls.push((*target, method.to_string(), args.to_vec()));
                    Ok::<(), Infallible>(())
                })
                .unwrap();
        }
    }

    #[test]
    fn test_trigger_then_remove() {
        let mut trigger = EventTrigger::new();
        let mut recorder = Recorder::default();
        let name = trigger.add(7, "foo");

        recorder.fire(&trigger, &[EventArg::Int(42)]);
        assert_eq!(recorder.calls, vec![(7, "foo".to_string(), vec![EventArg::Int(42)])]);

        assert!(trigger.remove(&name));
        recorder.fire(&trigger, &[EventArg::Int(43)]);
        assert_eq!(recorder.calls.len(), 1);
        assert!(!trigger.remove(&name));
    }

    #[test]
    fn test_context_is_appended_per_handler() {
        let mut trigger = EventTrigger::new();
        let mut recorder = Recorder::default();
        trigger.add_with(1, "enable", None, Some(EventArg::Bool(true)));
        trigger.add_with(2, "enable", None, Some(EventArg::Bool(false)));
        trigger.add(3, "ping");

        recorder.fire(&trigger, &[]);
        assert_eq!(recorder.calls[0].2, vec![EventArg::Bool(true)]);
        assert_eq!(recorder.calls[1].2, vec![EventArg::Bool(false)]);
        assert!(recorder.calls[2].2.is_empty());
    }

    #[test]
    fn test_auto_names_are_unique_and_named_add_replaces() {
        let mut trigger = EventTrigger::new();
        let a = trigger.add(1, "a");
        let b = trigger.add(2, "b");
        assert_ne!(a, b);

        trigger.add_with(10, "x", Some("named"), None);
        trigger.add(3, "c");
        trigger.add_with(11, "y", Some("named"), None);

        let order: Vec<_> = trigger.handlers().iter().map(|h| h.target).collect();
        assert_eq!(order, vec![1, 2, 11, 3]);
        assert_eq!(trigger.len(), 4);
        assert!(trigger.contains("named"));
    }

    #[test]
    fn test_error_stops_dispatch() {
        let mut trigger = EventTrigger::new();
        trigger.add(1, "fail");
        trigger.add(2, "never");

        let mut seen = Vec::new();
        let result = trigger.trigger(&[], |target, method, _| {
            seen.push(*target);
            if method == "fail" {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn test_event_arg_accessors() {
        assert_eq!(EventArg::from(true).as_bool(), Some(true));
        assert_eq!(EventArg::Int(3).as_float(), Some(3.0));
        assert_eq!(EventArg::from("hi").as_text(), Some("hi"));
        assert_eq!(EventArg::Float(1.5).as_int(), None);
    }
}
