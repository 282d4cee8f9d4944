//! Caller-supplied rules built from closures.
//!
//! These are ordinary [`Rule`] implementations; the engine gives them no
//! special treatment. A closure that returns `Err` fails the rule with the
//! error's message, and one that panics is contained by the engine.

use crate::core::{Outcome, Rule, Value};
use std::fmt::Display;
use std::sync::Arc;

type CheckFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// A rule backed by a fallible, possibly transforming closure.
///
/// # Example
///
/// ```rust
/// use modelguard::core::{Rule, Value};
/// use modelguard::rules::Custom;
///
/// let doubled = Custom::new("doubled", |v: &Value| match v.as_i64() {
///     Some(n) => Ok(Value::from(n * 2)),
///     None => Err("not an integer"),
/// });
///
/// assert!(doubled.evaluate(&Value::from(4)).is_pass());
/// ```
#[derive(Clone)]
pub struct Custom {
    code: String,
    check: CheckFn,
}

impl Custom {
    pub fn new<F, E>(code: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            code: code.into(),
            check: Arc::new(move |value: &Value| check(value).map_err(|e| e.to_string())),
        }
    }

    /// Build from a pure predicate and a fixed failure message.
    pub fn predicate<F>(code: impl Into<String>, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(code, move |value: &Value| {
            if predicate(value) {
                Ok(value.clone())
            } else {
                Err(message.clone())
            }
        })
    }
}

impl Rule for Custom {
    fn code(&self) -> &str {
        &self.code
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        match (self.check)(candidate) {
            Ok(value) => Outcome::Pass(value),
            Err(message) => Outcome::Fail(message),
        }
    }
}

impl std::fmt::Debug for Custom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Custom").field("code", &self.code).finish()
    }
}

/// Forbids one specific value.
pub fn not_equals(code: impl Into<String>, forbidden: impl Into<Value>) -> Custom {
    let forbidden = forbidden.into();
    let message = format!("Value must not be {}", forbidden.describe());
    Custom::predicate(code, move |value| !value.equivalent(&forbidden), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_error_becomes_failure_message() {
        let rule = Custom::new("even", |v: &Value| {
            if v.as_i64().is_some_and(|n| n % 2 == 0) {
                Ok(v.clone())
            } else {
                Err(format!("{v} is odd"))
            }
        });

        assert!(rule.evaluate(&Value::from(2)).is_pass());
        assert_eq!(rule.evaluate(&Value::from(3)), Outcome::fail("3 is odd"));
        assert_eq!(rule.code(), "even");
    }

    #[test]
    fn predicate_uses_fixed_message() {
        let rule = Custom::predicate(
            "no_spaces",
            |v| !v.as_str().unwrap_or("").contains(' '),
            "Username must not contain spaces",
        );

        assert_eq!(
            rule.evaluate(&Value::from("a b")),
            Outcome::fail("Username must not contain spaces")
        );
    }

    #[test]
    fn not_equals_rejects_the_forbidden_value() {
        let rule = not_equals("not_equals", "Shanyu");

        assert!(rule.evaluate(&Value::from("Mei")).is_pass());
        assert_eq!(
            rule.evaluate(&Value::from("Shanyu")),
            Outcome::fail("Value must not be 'Shanyu'")
        );
    }

    #[test]
    fn not_equals_compares_numbers_by_value() {
        let rule = not_equals("not_zero", 0);
        assert!(!rule.evaluate(&Value::from(0.0)).is_pass());
        assert!(rule.evaluate(&Value::from(0.5)).is_pass());
    }

    #[test]
    fn transforms_flow_through() {
        let rule = Custom::new("abs", |v: &Value| {
            v.as_i64().map(|n| Value::from(n.abs())).ok_or("not an integer")
        });
        assert_eq!(rule.evaluate(&Value::from(-4)), Outcome::pass(Value::from(4)));
    }
}
