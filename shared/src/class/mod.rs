pub mod class_factory;
pub mod class_id;
pub mod class_lineage;
pub mod class_registry;
pub mod error;
