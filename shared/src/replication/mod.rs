pub mod connection_context;
pub mod error;
pub mod field_mask;
pub mod pending_references;
pub mod receive_state;
pub mod remote_replicas;
pub mod replica_host;
pub mod replicate;
pub mod replicate_condition;
pub mod replicated;
pub mod replication_state;
