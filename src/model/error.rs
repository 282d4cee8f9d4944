//! Definition-time errors for fields, models and rule parameters.

use thiserror::Error;

/// Errors detected while declaring a model. These are programmer errors
/// and are raised eagerly, never deferred to construction time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionError {
    #[error("Model and field names must not be empty")]
    EmptyName,

    #[error("Model '{model}' declares field '{field}' more than once")]
    DuplicateFieldName { model: String, field: String },

    #[error("Field '{field}' has conflicting bounds: {detail}")]
    ConflictingBounds { field: String, detail: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Rule '{rule}' on field '{field}' cannot apply to declared type {declared}")]
    IncompatibleRule {
        field: String,
        rule: String,
        declared: String,
    },

    #[error("Field '{field}' has an unusable type: {reason}")]
    InvalidType { field: String, reason: String },

    #[error("Rule '{rule}' needs at least one value in its set")]
    EmptyMembership { rule: String },

    #[error("Invalid parameters for rule '{rule}': {reason}")]
    InvalidParameter { rule: String, reason: String },

    #[error("No rule registered under code '{code}'")]
    UnknownRule { code: String },

    #[error("Malformed model definition: {0}")]
    MalformedDefinition(String),
}
