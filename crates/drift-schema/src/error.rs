//! Error types for schema loading and validation.

/// Errors raised while loading or validating a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A column or domain names a base type or domain that doesn't exist.
    #[error("Unknown type '{name}' referenced by {context}")]
    UnknownType {
        /// The unresolved type name.
        name: String,
        /// Where the reference appeared (e.g. "column users.id").
        context: String,
    },

    /// A `$ref` path could not be resolved within the document.
    #[error("Unresolvable reference '{path}': {reason}")]
    BadRef {
        /// The `$ref` path as written.
        path: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A constraint combines mutually exclusive parameters.
    #[error("Constraint '{name}' on {context}: {message}")]
    ConflictingConstraint {
        /// Constraint name (possibly synthesized).
        name: String,
        /// Table or column the constraint is attached to.
        context: String,
        /// What was wrong with the parameter set.
        message: String,
    },

    /// A constraint is missing a required parameter.
    #[error("Constraint '{name}' on {context} is missing required field '{field}'")]
    MissingField {
        /// Constraint name.
        name: String,
        /// Table or column the constraint is attached to.
        context: String,
        /// The missing parameter.
        field: String,
    },

    /// Two columns in the same table share a name.
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Duplicated column name.
        column: String,
    },

    /// IO error reading a schema document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or doesn't fit the expected shape.
    #[error("Document error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
