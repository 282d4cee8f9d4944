//! Membership rules: `one_of`, `not_in`, `is_enum`.

use crate::core::{describe_set, EnumType, Outcome, Rule, Value};
use crate::model::DefinitionError;

fn non_empty(rule: &str, values: Vec<Value>) -> Result<Vec<Value>, DefinitionError> {
    if values.is_empty() {
        return Err(DefinitionError::EmptyMembership {
            rule: rule.to_string(),
        });
    }
    Ok(values)
}

fn member_of(values: &[Value], candidate: &Value, case_sensitive: bool) -> bool {
    values.iter().any(|allowed| {
        if case_sensitive {
            allowed.equivalent(candidate)
        } else {
            allowed.eq_ignore_case(candidate)
        }
    })
}

/// Candidate must equal one of a fixed set of values.
#[derive(Clone, Debug, PartialEq)]
pub struct OneOf {
    allowed: Vec<Value>,
    case_sensitive: bool,
}

impl OneOf {
    pub fn new<I, V>(allowed: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let allowed = non_empty("one_of", allowed.into_iter().map(Into::into).collect())?;
        Ok(Self {
            allowed,
            case_sensitive: true,
        })
    }

    /// String members compare case-insensitively.
    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

impl Rule for OneOf {
    fn code(&self) -> &str {
        "one_of"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        if member_of(&self.allowed, candidate, self.case_sensitive) {
            return Outcome::pass(candidate.clone());
        }

        let suffix = if self.case_sensitive {
            ""
        } else {
            " (case-insensitive)"
        };
        Outcome::fail(format!(
            "Value {} is not in the set of allowed values: {}{suffix}",
            candidate.describe(),
            describe_set(&self.allowed)
        ))
    }
}

/// Candidate must not equal any of a fixed set of values.
#[derive(Clone, Debug, PartialEq)]
pub struct NotIn {
    forbidden: Vec<Value>,
    case_sensitive: bool,
}

impl NotIn {
    pub fn new<I, V>(forbidden: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let forbidden = non_empty("not_in", forbidden.into_iter().map(Into::into).collect())?;
        Ok(Self {
            forbidden,
            case_sensitive: true,
        })
    }

    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

impl Rule for NotIn {
    fn code(&self) -> &str {
        "not_in"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        if !member_of(&self.forbidden, candidate, self.case_sensitive) {
            return Outcome::pass(candidate.clone());
        }

        let suffix = if self.case_sensitive {
            ""
        } else {
            " (case-insensitive)"
        };
        Outcome::fail(format!(
            "Value {} is in the set of disallowed values: {}{suffix}",
            candidate.describe(),
            describe_set(&self.forbidden)
        ))
    }
}

/// Candidate must be a member of an [`EnumType`].
#[derive(Clone, Debug, PartialEq)]
pub struct IsEnum {
    kind: EnumType,
}

impl IsEnum {
    pub fn new(kind: EnumType) -> Result<Self, DefinitionError> {
        if kind.members().is_empty() {
            return Err(DefinitionError::EmptyMembership {
                rule: "is_enum".to_string(),
            });
        }
        Ok(Self { kind })
    }
}

impl Rule for IsEnum {
    fn code(&self) -> &str {
        "is_enum"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        if self.kind.contains(candidate) {
            Outcome::pass(candidate.clone())
        } else {
            Outcome::fail(format!(
                "Value {} is not a valid {} value. Valid values are: {}",
                candidate.describe(),
                self.kind.name(),
                self.kind.describe_members()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_lists_allowed_values() {
        let rule = OneOf::new(["red", "green"]).unwrap();

        assert!(rule.evaluate(&Value::from("red")).is_pass());
        assert_eq!(
            rule.evaluate(&Value::from("blue")),
            Outcome::fail("Value 'blue' is not in the set of allowed values: 'red', 'green'")
        );
    }

    #[test]
    fn one_of_ignore_case() {
        let rule = OneOf::new(["Red"]).unwrap().ignore_case();
        assert!(rule.evaluate(&Value::from("RED")).is_pass());
    }

    #[test]
    fn not_in_lists_forbidden_values() {
        let rule = NotIn::new(["Shanyu"]).unwrap();

        assert!(rule.evaluate(&Value::from("Mei")).is_pass());
        assert_eq!(
            rule.evaluate(&Value::from("Shanyu")),
            Outcome::fail("Value 'Shanyu' is in the set of disallowed values: 'Shanyu'")
        );
        assert!(!NotIn::new(["shanyu"])
            .unwrap()
            .ignore_case()
            .evaluate(&Value::from("SHANYU"))
            .is_pass());
    }

    #[test]
    fn numeric_membership() {
        let rule = OneOf::new([1, 2, 3]).unwrap();
        assert!(rule.evaluate(&Value::from(2)).is_pass());
        assert!(!rule.evaluate(&Value::from(4)).is_pass());
    }

    #[test]
    fn integer_sets_match_equal_reals() {
        let allowed = OneOf::new([1, 2, 3]).unwrap();
        assert!(allowed.evaluate(&Value::from(2.0)).is_pass());
        assert!(!allowed.evaluate(&Value::from(2.5)).is_pass());

        let forbidden = NotIn::new([0]).unwrap();
        assert_eq!(
            forbidden.evaluate(&Value::from(0.0)),
            Outcome::fail("Value 0 is in the set of disallowed values: 0")
        );
        assert!(!NotIn::new([1.5]).unwrap().evaluate(&Value::from(1.5)).is_pass());
    }

    #[test]
    fn is_enum_matches_numeric_members_across_kinds() {
        let rule = IsEnum::new(EnumType::new("Level", [1, 2, 3])).unwrap();
        assert!(rule.evaluate(&Value::from(3.0)).is_pass());
        assert!(!rule.evaluate(&Value::from(3.5)).is_pass());
    }

    #[test]
    fn empty_sets_are_rejected() {
        let err = OneOf::new(Vec::<Value>::new()).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::EmptyMembership {
                rule: "one_of".to_string()
            }
        );
        assert!(IsEnum::new(EnumType::new("Empty", Vec::<Value>::new())).is_err());
    }

    #[test]
    fn is_enum_names_the_enum() {
        let rule = IsEnum::new(EnumType::new("UserRole", ["admin", "viewer"])).unwrap();

        assert_eq!(
            rule.evaluate(&Value::from("owner")),
            Outcome::fail(
                "Value 'owner' is not a valid UserRole value. Valid values are: 'admin', 'viewer'"
            )
        );
    }
}
