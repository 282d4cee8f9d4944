//! Builder API for ergonomic model declaration.
//!
//! This module provides fluent builders and the [`model!`](crate::model!)
//! macro. Every path ends in the same eager definition-time checks, so a
//! model built here is rejected up front if it can never validate anything.

pub mod field;
pub mod macros;
pub mod model;

pub use field::FieldBuilder;
pub use model::ModelBuilder;

use crate::core::{FieldType, Rule};
use crate::model::{DefinitionError, FieldOptions, FieldSpec, ModelSpec};
use std::sync::Arc;

/// Declare a field from an already assembled rule chain.
///
/// # Example
///
/// ```
/// use modelguard::builder::define_field;
/// use modelguard::core::FieldType;
/// use modelguard::model::FieldOptions;
/// use modelguard::rules::MinLength;
/// use std::sync::Arc;
///
/// let field = define_field(
///     "password",
///     FieldType::String,
///     FieldOptions::REQUIRED,
///     vec![Arc::new(MinLength::new(8))],
/// )
/// .unwrap();
/// assert_eq!(field.rule_codes(), vec!["min_length"]);
/// ```
pub fn define_field(
    name: impl Into<String>,
    field_type: FieldType,
    options: FieldOptions,
    rules: Vec<Arc<dyn Rule>>,
) -> Result<FieldSpec, DefinitionError> {
    FieldSpec::new(name, field_type, options, rules)
}

/// Freeze a model from declared fields.
///
/// # Example
///
/// ```
/// use modelguard::builder::{define_field, define_model};
/// use modelguard::core::FieldType;
/// use modelguard::model::{DefinitionError, FieldOptions};
///
/// let age = || define_field("age", FieldType::Integer, FieldOptions::REQUIRED, vec![]).unwrap();
/// let result = define_model("User", vec![age(), age()]);
/// assert!(matches!(result, Err(DefinitionError::DuplicateFieldName { .. })));
/// ```
pub fn define_model(
    name: impl Into<String>,
    fields: Vec<FieldSpec>,
) -> Result<ModelSpec, DefinitionError> {
    ModelSpec::new(name, fields)
}
