//! Per-field failures and the aggregate failure report.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a single field failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    MissingRequired,
    NullNotAllowed,
    TypeMismatch,
    RuleViolation { rule: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => f.write_str("missing required"),
            Self::NullNotAllowed => f.write_str("null not allowed"),
            Self::TypeMismatch => f.write_str("type mismatch"),
            Self::RuleViolation { rule } => write!(f, "rule violation ({rule})"),
        }
    }
}

/// The single failure recorded for one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    #[serde(flatten)]
    pub kind: FailureKind,
    pub message: String,
}

impl FieldFailure {
    pub fn missing_required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FailureKind::MissingRequired,
            message: format!("Field '{field}' is required"),
        }
    }

    pub fn null_not_allowed(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FailureKind::NullNotAllowed,
            message: format!("Null value is not allowed for field '{field}'"),
        }
    }

    pub fn type_mismatch(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind: FailureKind::TypeMismatch,
            message: message.into(),
        }
    }

    pub fn rule_violation(field: &str, rule: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind: FailureKind::RuleViolation {
                rule: rule.to_string(),
            },
            message: message.into(),
        }
    }

    /// Code of the violated rule; `None` unless this is a rule violation.
    pub fn rule_code(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::RuleViolation { rule } => Some(rule),
            _ => None,
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.field, self.kind, self.message)
    }
}

fn render(failures: &[FieldFailure]) -> String {
    let lines: String = failures
        .iter()
        .map(|failure| format!("\n  - {failure}"))
        .collect();
    format!(" ({} invalid field(s)):{lines}", failures.len())
}

/// Everything wrong with one construction call: one entry per failing
/// field, in model field order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("Validation failed for model '{model}'{}", render(.failures))]
pub struct AggregateFailure {
    model: String,
    failures: Vec<FieldFailure>,
}

impl AggregateFailure {
    /// Callers guarantee `failures` is non-empty.
    pub(crate) fn new(model: &str, failures: Vec<FieldFailure>) -> Self {
        debug_assert!(!failures.is_empty());
        Self {
            model: model.to_string(),
            failures,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldFailure> {
        self.failures.iter().find(|failure| failure.field == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldFailure> {
        self.failures.iter()
    }

    pub fn into_failures(self) -> Vec<FieldFailure> {
        self.failures
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_code_only_for_violations() {
        assert_eq!(FieldFailure::missing_required("age").rule_code(), None);
        assert_eq!(
            FieldFailure::rule_violation("password", "min_length", "too short").rule_code(),
            Some("min_length")
        );
    }

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            FieldFailure::missing_required("age").message,
            "Field 'age' is required"
        );
        assert_eq!(
            FieldFailure::null_not_allowed("nickname").message,
            "Null value is not allowed for field 'nickname'"
        );
    }

    #[test]
    fn display_lists_every_field() {
        let report = AggregateFailure::new(
            "User",
            vec![
                FieldFailure::missing_required("age"),
                FieldFailure::rule_violation("nickname", "not_in", "bad nickname"),
            ],
        );

        assert_eq!(
            report.to_string(),
            "Validation failed for model 'User' (2 invalid field(s)):\n  \
             - age: missing required - Field 'age' is required\n  \
             - nickname: rule violation (not_in) - bad nickname"
        );
    }

    #[test]
    fn serializes_for_responses() {
        let report = AggregateFailure::new(
            "User",
            vec![FieldFailure::rule_violation("age", "min_value", "too small")],
        );

        assert_eq!(
            report.to_json(),
            json!({
                "model": "User",
                "failures": [
                    {"field": "age", "kind": "rule_violation", "rule": "min_value", "message": "too small"}
                ]
            })
        );
    }
}
