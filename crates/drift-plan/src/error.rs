//! Error types for the planning pipeline.

/// Errors that can occur while producing a migration plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The desired-schema document failed to load or validate.
    #[error("Schema error: {0}")]
    Schema(#[from] drift_schema::SchemaError),

    /// The `--schema` filter named a schema the document doesn't declare.
    #[error("Schema '{name}' not found in the desired-schema document")]
    UnknownSchema {
        /// The requested schema name.
        name: String,
    },

    /// IO error reading inputs or writing the script.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot file was not valid JSON.
    #[error("Snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;
