//! Error types for schema conversion

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema conversion errors
///
/// Almost every irregularity in a schema document is recovered locally
/// (empty lookup results, absent nodes, skolem fallbacks); these errors
/// cover the conditions that cannot be: an unusable base namespace, an
/// unparseable input document, and registry invariant violations.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Component at {path} already registered with a different identifier")]
    ComponentAlreadyExists { path: String },

    #[error("Document error: {0}")]
    Document(#[from] serde_yaml::Error),
}
