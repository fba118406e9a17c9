//! Component registry
//!
//! Maps the type names used in scene descriptions to constructors. The table
//! is filled at startup; lookups of unregistered names fail.

use std::collections::HashMap;

use super::component::{Component, ComponentKind};
use super::components::{Collider, Enabler, Position};
use super::SceneError;

/// Constructor stored in the registry
pub type Constructor = fn() -> Box<dyn Component>;

fn construct<T: ComponentKind>() -> Box<dyn Component> {
    Box::<T>::default()
}

/// Registry of component constructors keyed by type name
#[derive(Default, Clone)]
pub struct ComponentFactory {
    constructors: HashMap<&'static str, Constructor>,
}

impl ComponentFactory {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the engine's own components
    pub fn with_engine_components() -> Self {
        Self::new()
            .with::<Position>()
            .with::<Collider>()
            .with::<Enabler>()
    }

    /// Register a component type under its `TYPE_NAME`
    pub fn register<T: ComponentKind>(&mut self) -> &mut Self {
        self.register_fn(T::TYPE_NAME, construct::<T>)
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with<T: ComponentKind>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Register a constructor under an explicit name, replacing any previous one
    pub fn register_fn(&mut self, name: &'static str, constructor: Constructor) -> &mut Self {
        if self.constructors.insert(name, constructor).is_some() {
            log::debug!("Component type '{}' re-registered", name);
        }
        self
    }

    /// Instantiate a component by type name.
    ///
    /// Returns the registered (static) name alongside the instance.
    pub fn create(&self, name: &str) -> Result<(&'static str, Box<dyn Component>), SceneError> {
        match self.constructors.get_key_value(name) {
            Some((kind, constructor)) => Ok((*kind, constructor())),
            None => {
                log::error!("Unknown component type '{}'", name);
                Err(SceneError::UnknownComponentType(name.to_string()))
            }
        }
    }

    /// Whether a type name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl std::fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("types", &self.type_names())
            .finish()
    }
}
