use thiserror::Error;

use crate::{class::error::ClassIdentityError, field::error::ConfigError};

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// Class ids are only assigned once the protocol is locked
    #[error("Protocol is not locked yet. Call Protocol.lock() once every class has been added")]
    NotLocked,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ClassIdentity(#[from] ClassIdentityError),

    /// Class was never added to this protocol
    #[error("Class '{class}' not registered with Protocol. Must call `add_class()` during protocol initialization")]
    UnregisteredClass { class: &'static str },
}
