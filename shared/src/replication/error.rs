use statecast_serde::SerdeErr;
use thiserror::Error;

/// Errors raised while writing or applying replication messages
///
/// A failed read leaves the target object untouched. The connection layer
/// is expected to drop the message, and for protocol violations the
/// connection as well.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    #[error("Malformed replication message: {0}")]
    Serde(#[from] SerdeErr),

    /// Mask sets bits past the last declared field
    #[error("Field mask {bits:#b} sets bits past the {len} declared fields")]
    InvalidFieldMask { bits: u32, len: u8 },

    #[error("No replicated object with net id {net_id}")]
    UnknownObject { net_id: u32 },

    #[error("A replicated object with net id {net_id} already exists")]
    DuplicateObject { net_id: u32 },

    /// The remote factory has no constructor for this class id
    #[error("Cannot spawn object of unknown class id {id:#010x}")]
    UnknownClassId { id: u32 },
}
