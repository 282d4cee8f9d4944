//! Core value types and the rule contract.
//!
//! This module contains the pure building blocks of validation:
//! - Untyped candidate values via `Value`
//! - Declared semantic types and the type gate via `FieldType`
//! - The `Rule` trait every built-in and custom rule implements
//! - Three-state raw input via `RawInput`
//!
//! Nothing in this module performs I/O or holds shared mutable state.

mod field_type;
mod input;
mod rule;
mod value;

pub(crate) use field_type::describe_set;
pub use field_type::{EnumType, FieldType, TypeMismatch};
pub use input::{InputError, RawEntry, RawInput};
pub use rule::{Limits, Operand, Outcome, Rule};
pub use value::{Number, Value};
