use thiserror::Error;

use crate::types::HostType;

/// Errors raised while resolving class ids or constructing by class id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassIdentityError {
    /// The server and client variants of a class share no replicated ancestor
    #[error("Class '{class}' has server variant '{server}' and client variant '{client}', which share no replicated base class")]
    IncompatibleReplicatedClassHierarchy {
        class: &'static str,
        server: &'static str,
        client: &'static str,
    },

    /// A class name was looked up that was never registered or declared
    #[error("Class '{name}' is not registered. Must call `add_class()` or `declare_class()` during protocol initialization")]
    UnknownClass { name: &'static str },

    /// Two unrelated classes hash to the same id
    #[error("Classes '{first}' and '{second}' both resolve to class id {id:#010x}")]
    ClassIdCollision {
        id: u32,
        first: &'static str,
        second: &'static str,
    },

    /// A class was added to the factory of a role it is not constructed on
    #[error("Class '{class}' is not a {role:?} class and cannot be added to a {role:?} factory")]
    WrongRole { class: &'static str, role: HostType },

    /// Two classes of one role share a class id
    #[error("Class id {id:#010x} is already constructed as '{first}' and cannot also construct '{second}'")]
    DuplicateFactoryEntry {
        id: u32,
        first: &'static str,
        second: &'static str,
    },

    /// No constructor is registered for an incoming class id
    #[error("No constructor registered for class id {id:#010x}")]
    UnknownClassId { id: u32 },
}
