//! String shape rules and string transforms.
//!
//! Length is measured in Unicode scalar values, not bytes.

use crate::core::{Limits, Operand, Outcome, Rule, Value};
use crate::model::DefinitionError;
use regex::Regex;

fn text<'a>(code: &str, candidate: &'a Value) -> Result<&'a str, Outcome> {
    candidate.as_str().ok_or_else(|| {
        Outcome::fail(format!(
            "Rule '{code}' expected a string, got {}",
            candidate.type_name()
        ))
    })
}

macro_rules! text_or_fail {
    ($self:ident, $candidate:ident) => {
        match text($self.code(), $candidate) {
            Ok(s) => s,
            Err(outcome) => return outcome,
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinLength {
    min: usize,
}

impl MinLength {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Rule for MinLength {
    fn code(&self) -> &str {
        "min_length"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        let len = s.chars().count();
        if len < self.min {
            Outcome::fail(format!(
                "String '{s}' has length {len}, which is less than the minimum length of {}",
                self.min
            ))
        } else {
            Outcome::pass(candidate.clone())
        }
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }

    fn limits(&self) -> Limits {
        Limits {
            min_length: Some(self.min),
            ..Limits::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Rule for MaxLength {
    fn code(&self) -> &str {
        "max_length"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        let len = s.chars().count();
        if len > self.max {
            Outcome::fail(format!(
                "String '{s}' has length {len}, which exceeds the maximum length of {}",
                self.max
            ))
        } else {
            Outcome::pass(candidate.clone())
        }
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }

    fn limits(&self) -> Limits {
        Limits {
            max_length: Some(self.max),
            ..Limits::default()
        }
    }
}

/// Substring check, optionally case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contains {
    substring: String,
    case_sensitive: bool,
}

impl Contains {
    pub fn new(substring: impl Into<String>) -> Self {
        Self {
            substring: substring.into(),
            case_sensitive: true,
        }
    }

    pub fn ignore_case(substring: impl Into<String>) -> Self {
        Self {
            substring: substring.into(),
            case_sensitive: false,
        }
    }
}

impl Rule for Contains {
    fn code(&self) -> &str {
        "contains"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        if self.case_sensitive && !s.contains(&self.substring) {
            Outcome::fail(format!("String '{s}' does not contain '{}'", self.substring))
        } else if !self.case_sensitive
            && !s.to_lowercase().contains(&self.substring.to_lowercase())
        {
            Outcome::fail(format!(
                "String '{s}' does not contain '{}' (case-insensitive)",
                self.substring
            ))
        } else {
            Outcome::pass(candidate.clone())
        }
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }
}

/// Prefix check, optionally case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeginsWith {
    prefix: String,
    case_sensitive: bool,
}

impl BeginsWith {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            case_sensitive: true,
        }
    }

    pub fn ignore_case(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            case_sensitive: false,
        }
    }
}

impl Rule for BeginsWith {
    fn code(&self) -> &str {
        "begins_with"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        if self.case_sensitive && !s.starts_with(&self.prefix) {
            Outcome::fail(format!("String '{s}' does not begin with '{}'", self.prefix))
        } else if !self.case_sensitive
            && !s.to_lowercase().starts_with(&self.prefix.to_lowercase())
        {
            Outcome::fail(format!(
                "String '{s}' does not begin with '{}' (case-insensitive)",
                self.prefix
            ))
        } else {
            Outcome::pass(candidate.clone())
        }
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }
}

/// Regular-expression check. A string passes when the pattern matches at
/// its start; anchor with `$` to require a full match.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles eagerly so a bad expression is a definition-time error.
    pub fn new(pattern: &str) -> Result<Self, DefinitionError> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|e| DefinitionError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Rule for Pattern {
    fn code(&self) -> &str {
        "pattern"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        let matches_at_start = self.regex.find(s).is_some_and(|m| m.start() == 0);
        if matches_at_start {
            Outcome::pass(candidate.clone())
        } else {
            Outcome::fail(format!(
                "String '{s}' does not match pattern '{}'",
                self.regex.as_str()
            ))
        }
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }
}

/// Transform: strips leading and trailing whitespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Trim;

impl Rule for Trim {
    fn code(&self) -> &str {
        "trim"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        Outcome::pass(Value::from(s.trim()))
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }
}

/// Transform: lowercases the string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lowercase;

impl Rule for Lowercase {
    fn code(&self) -> &str {
        "lowercase"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let s = text_or_fail!(self, candidate);
        Outcome::pass(Value::from(s.to_lowercase()))
    }

    fn operand(&self) -> Operand {
        Operand::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_length_counts_chars() {
        let rule = MinLength::new(3);

        assert!(rule.evaluate(&Value::from("héé")).is_pass());
        assert_eq!(
            rule.evaluate(&Value::from("ab")),
            Outcome::fail("String 'ab' has length 2, which is less than the minimum length of 3")
        );
    }

    #[test]
    fn max_length_reports_actual_length() {
        assert_eq!(
            MaxLength::new(2).evaluate(&Value::from("abc")),
            Outcome::fail("String 'abc' has length 3, which exceeds the maximum length of 2")
        );
    }

    #[test]
    fn contains_respects_case_setting() {
        assert!(Contains::new("@").evaluate(&Value::from("a@b")).is_pass());
        assert!(!Contains::new("AB").evaluate(&Value::from("xaby")).is_pass());
        assert!(Contains::ignore_case("AB").evaluate(&Value::from("xaby")).is_pass());
    }

    #[test]
    fn begins_with_message() {
        assert_eq!(
            BeginsWith::new("usr_").evaluate(&Value::from("admin")),
            Outcome::fail("String 'admin' does not begin with 'usr_'")
        );
        assert!(BeginsWith::ignore_case("USR_")
            .evaluate(&Value::from("usr_1"))
            .is_pass());
    }

    #[test]
    fn pattern_matches_at_start() {
        let rule = Pattern::new(r"[a-z]+\d").unwrap();

        assert!(rule.evaluate(&Value::from("abc1 trailing")).is_pass());
        assert_eq!(
            rule.evaluate(&Value::from("1abc1")),
            Outcome::fail("String '1abc1' does not match pattern '[a-z]+\\d'")
        );
    }

    #[test]
    fn invalid_pattern_is_a_definition_error() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidPattern { .. }));
    }

    #[test]
    fn transforms_return_new_values() {
        assert_eq!(
            Trim.evaluate(&Value::from("  bob ")),
            Outcome::pass(Value::from("bob"))
        );
        assert_eq!(
            Lowercase.evaluate(&Value::from("BoB")),
            Outcome::pass(Value::from("bob"))
        );
    }

    #[test]
    fn string_rules_fail_on_other_types() {
        assert_eq!(
            MinLength::new(1).evaluate(&Value::from(5)),
            Outcome::fail("Rule 'min_length' expected a string, got integer")
        );
    }
}
