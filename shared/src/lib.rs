//! # Statecast Shared
//! Typed field-level delta replication: field tables, class identity, and the
//! per-connection diff engine shared by hosts and remotes.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use statecast_serde::{
    Archive, ArchiveMode, BitArchive, ByteStream, Color32, Matrix4x4, MemoryStream, Quaternion,
    Serde, SerdeErr, SignedBits, UnsignedBits, Vector2, Vector3, Vector4, MAX_BIT_WIDTH,
};

mod class;
mod constants;
mod field;
mod protocol;
mod replication;
mod types;

pub use class::{
    class_factory::{plays_role, ClassFactory},
    class_id::ClassId,
    class_lineage::ClassLineage,
    class_registry::ClassRegistry,
    error::ClassIdentityError,
};
pub use constants::MAX_REPLICATED_FIELDS;
pub use field::{
    composite::{Composite, CompositeSerializer},
    error::ConfigError,
    field_decl::FieldDecl,
    field_serializer::{FieldSerializer, ValueSerializer},
    field_table::{FieldSpec, FieldTable, FieldTableBuilder},
    list_serializer::ListSerializer,
    object_ref::{ObjectRef, ReferenceSerializer},
    reference_collector::{ObjectLookup, ReferenceCollector, ScopedCollector},
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use replication::{
    connection_context::ConnectionContext,
    error::ReplicationError,
    field_mask::FieldMask,
    pending_references::PendingReferences,
    receive_state::ReceiveState,
    remote_replicas::RemoteReplicas,
    replica_host::ReplicaHost,
    replicate::Replicate,
    replicate_condition::ReplicateCondition,
    replicated::{Replica, Replicated},
    replication_state::ReplicationState,
};
pub use types::{ConnectionId, FieldIndex, HostType, LocalKey, NetId};
