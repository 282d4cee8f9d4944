//! Modelguard: declarative validation for record-like models
//!
//! Modelguard keeps a pure core: a model is declared once as an immutable
//! [`ModelSpec`], and every construction call is a pure function from raw
//! input to either a [`ValidatedInstance`] or an [`AggregateFailure`] that
//! names every invalid field. Failures are accumulated with Stillwater's
//! `Validation`, so nothing short-circuits across fields.
//!
//! # Core Concepts
//!
//! - **Rule**: a named, pure check that passes (possibly transforming) or fails with a message
//! - **Field**: a declared type, presence/null flags and an ordered rule chain
//! - **Model**: a frozen list of fields, shareable across threads without locks
//! - **Construction**: presence, then null, then type, then the chain, per field
//!
//! # Example
//!
//! ```rust
//! use modelguard::core::{FieldType, RawInput};
//! use modelguard::model;
//!
//! let spec = model! {
//!     "User" {
//!         age: FieldType::Integer => [min_value(13)];
//!         nickname: FieldType::String, optional, nullable => [not_in(["Shanyu"])];
//!     }
//! }
//! .unwrap();
//!
//! let user = spec
//!     .construct(&RawInput::new().with("age", 13).with("nickname", "Sam"))
//!     .unwrap();
//! assert_eq!(user.get("age").unwrap().and_then(|v| v.as_i64()), Some(13));
//!
//! let report = spec
//!     .construct(&RawInput::new().with("age", 10).with("nickname", "Shanyu"))
//!     .unwrap_err();
//! assert_eq!(report.len(), 2);
//! ```

pub mod builder;
pub mod core;
pub mod definition;
pub mod engine;
pub mod model;
pub mod registry;
pub mod rules;

// Re-export commonly used types
pub use builder::{define_field, define_model, FieldBuilder, ModelBuilder};
pub use core::{EnumType, FieldType, RawInput, Rule, Value};
pub use definition::ModelDefinition;
pub use engine::{construct, AggregateFailure, FailureKind, FieldFailure, ValidatedInstance};
pub use model::{DefinitionError, FieldOptions, FieldSpec, ModelSpec};
pub use registry::RuleRegistry;
