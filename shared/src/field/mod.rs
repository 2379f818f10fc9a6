pub mod composite;
pub mod error;
pub mod field_binding;
pub mod field_decl;
pub mod field_serializer;
pub mod field_table;
pub mod list_serializer;
pub mod object_ref;
pub mod reference_collector;
