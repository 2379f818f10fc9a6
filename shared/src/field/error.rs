use thiserror::Error;

/// Errors raised while building a class's field table
///
/// These describe a broken data model, not a runtime condition, and are
/// reported when the class is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// More fields than the field mask can address
    #[error("Class '{class}' declares {count} replicated fields, at most {max} are supported")]
    TooManyFields {
        class: &'static str,
        count: usize,
        max: usize,
    },

    /// A field names a notify handler the class cannot resolve
    #[error("Field '{field}' of class '{class}' names notify handler '{handler}', which `Replicate::resolve_notify()` does not know")]
    MissingNotifyHandler {
        class: &'static str,
        field: &'static str,
        handler: &'static str,
    },

    /// Two fields were declared under the same name
    #[error("Class '{class}' declares field '{field}' more than once")]
    DuplicateFieldName {
        class: &'static str,
        field: &'static str,
    },
}
