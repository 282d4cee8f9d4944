//! Field and model specifications.
//!
//! A [`ModelSpec`] is assembled once from [`FieldSpec`]s and frozen. All
//! misconfiguration (duplicate names, contradictory bounds, rules that can
//! never apply to the declared type) surfaces here as a
//! [`DefinitionError`], before any instance is constructed.

mod error;
mod spec;

pub use error::DefinitionError;
pub use spec::{FieldOptions, FieldSpec, ModelSpec};
