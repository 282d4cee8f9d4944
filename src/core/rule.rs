//! The rule contract shared by built-in and custom rules.
//!
//! Rules are pure: `evaluate` must be deterministic for a given candidate
//! and bound parameters, and must not touch shared mutable state. A rule
//! may transform the candidate by returning a different value in
//! [`Outcome::Pass`]; the next rule in the chain sees that value.

use super::value::{Number, Value};
use std::fmt;

/// Result of evaluating one rule against one candidate.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Candidate accepted, possibly transformed
    Pass(Value),

    /// Candidate rejected with a human-readable message
    Fail(String),
}

impl Outcome {
    pub fn pass(value: Value) -> Self {
        Self::Pass(value)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

/// Kind of value a rule knows how to reason about.
///
/// The builder uses this to reject chains that could never apply, such as
/// a length rule on an integer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Any,
    Numeric,
    Text,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any value"),
            Self::Numeric => f.write_str("numbers"),
            Self::Text => f.write_str("strings"),
        }
    }
}

/// Static bounds a rule imposes, checked for consistency across a chain
/// when the field is declared. Value bounds are inclusive unless the
/// matching `*_exclusive` flag is set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Limits {
    pub min_value: Option<Number>,
    pub min_exclusive: bool,
    pub max_value: Option<Number>,
    pub max_exclusive: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// A single named, parameterized validation unit.
///
/// # Example
///
/// ```rust
/// use modelguard::core::{Outcome, Rule, Value};
///
/// struct NotEquals(Value);
///
/// impl Rule for NotEquals {
///     fn code(&self) -> &str {
///         "not_equals"
///     }
///
///     fn evaluate(&self, candidate: &Value) -> Outcome {
///         if *candidate == self.0 {
///             Outcome::fail(format!("Value must not be {}", self.0.describe()))
///         } else {
///             Outcome::pass(candidate.clone())
///         }
///     }
/// }
///
/// let rule = NotEquals(Value::from("Shanyu"));
/// assert!(rule.evaluate(&Value::from("Mei")).is_pass());
/// assert!(!rule.evaluate(&Value::from("Shanyu")).is_pass());
/// ```
pub trait Rule: Send + Sync {
    /// Stable identifier reported in rule violations, e.g. `min_length`.
    fn code(&self) -> &str;

    /// Evaluate the rule. The candidate is present, non-null and has
    /// already passed the field's type gate.
    fn evaluate(&self, candidate: &Value) -> Outcome;

    fn operand(&self) -> Operand {
        Operand::Any
    }

    fn limits(&self) -> Limits {
        Limits::default()
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self.code())
    }
}
