//! Validation engine: the construction protocol and its results.
//!
//! [`construct`] takes a frozen [`ModelSpec`](crate::model::ModelSpec) and
//! one [`RawInput`](crate::core::RawInput) and returns either a
//! [`ValidatedInstance`] or an [`AggregateFailure`].
//!
//! # Philosophy
//!
//! Collect all across fields, short-circuit within a field. A caller gets
//! every invalid field in one pass, and each field reports the first thing
//! wrong with it rather than a cascade of follow-on violations.
//!
//! # Example
//!
//! ```rust
//! use modelguard::builder::{FieldBuilder, ModelBuilder};
//! use modelguard::core::{FieldType, RawInput};
//! use modelguard::engine::FailureKind;
//!
//! let spec = ModelBuilder::new("User")
//!     .field(FieldBuilder::new("age", FieldType::Integer).min_value(13))
//!     .field(FieldBuilder::new("nickname", FieldType::String).not_in(["Shanyu"]))
//!     .build()
//!     .unwrap();
//!
//! let report = spec
//!     .construct(&RawInput::new().with("age", 10).with("nickname", "Shanyu"))
//!     .unwrap_err();
//!
//! assert_eq!(report.len(), 2);
//! assert_eq!(report.failures()[0].field, "age");
//! assert!(matches!(report.failures()[1].kind, FailureKind::RuleViolation { .. }));
//! ```

mod construct;
mod instance;
mod report;

pub use construct::{check_field, construct, evaluate_contained, FieldCheck};
pub use instance::{AccessError, ValidatedInstance};
pub use report::{AggregateFailure, FailureKind, FieldFailure};
