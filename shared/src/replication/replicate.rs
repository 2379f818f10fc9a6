use crate::{
    class::class_lineage::ClassLineage,
    field::{error::ConfigError, field_table::FieldTable},
};

/// A class whose fields are replicated
///
/// ```ignore
/// #[derive(Default)]
/// struct Pawn {
///     health: i32,
///     owner_secret: String,
/// }
///
/// impl ClassLineage for Pawn {
///     const CLASS_NAME: &'static str = "Game.Pawn";
/// }
///
/// impl Replicate for Pawn {
///     fn field_table() -> Result<FieldTable<Self>, ConfigError> {
///         FieldTable::builder()
///             .add(field!(Pawn, health))
///             .add(field!(Pawn, owner_secret).condition(ReplicateCondition::OwnerOnly))
///             .build()
///     }
/// }
/// ```
pub trait Replicate: ClassLineage + Default + Send {
    /// Declares the replicated fields in wire order
    fn field_table() -> Result<FieldTable<Self>, ConfigError>;

    /// Looks up a notify handler by name for `FieldDecl::notify_named`
    fn resolve_notify(_name: &str) -> Option<fn(&mut Self)> {
        None
    }
}
