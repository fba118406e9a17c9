//! Scene and component errors

use super::EntityId;

/// Errors raised by scene construction, hierarchy edits and component calls
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The entity already has a parent
    #[error("entity {child:?} is already attached to a parent")]
    AlreadyParented {
        /// Entity that was being attached
        child: EntityId,
    },

    /// The entity is not a direct child of the given parent
    #[error("entity {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Expected parent
        parent: EntityId,
        /// Entity that was being detached
        child: EntityId,
    },

    /// Attaching would make an entity its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CyclicAttachment {
        /// Requested parent
        parent: EntityId,
        /// Entity that was being attached
        child: EntityId,
    },

    /// Unknown or destroyed entity id
    #[error("entity {0:?} does not exist")]
    EntityNotFound(EntityId),

    /// No constructor is registered for this type name
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    /// A component descriptor could not be interpreted
    #[error("invalid descriptor for {kind}: {message}")]
    InvalidDescriptor {
        /// Component type name
        kind: String,
        /// Parser message
        message: String,
    },

    /// A required component is absent
    #[error("entity {entity:?} has no {kind} component")]
    MissingComponent {
        /// Owner that was searched
        entity: EntityId,
        /// Component type name
        kind: String,
    },

    /// A dotted reference names nothing in the scene
    #[error("unresolved reference '{0}'")]
    UnresolvedReference(String),

    /// The component does not implement the requested capability
    #[error("{kind} component is not a {capability}")]
    MissingCapability {
        /// Component type name
        kind: String,
        /// Capability that was required
        capability: &'static str,
    },

    /// Only detached entities can be destroyed
    #[error("entity {0:?} must be detached before it is destroyed")]
    NotDetached(EntityId),

    /// The scene root is permanent
    #[error("the scene root cannot be detached or destroyed")]
    CannotRemoveRoot,

    /// Failure reported by component logic
    #[error("component error: {0}")]
    Component(String),
}
