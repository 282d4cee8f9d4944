//! Registry mapping rule codes to rule factories.
//!
//! A registry is an explicit value handed to whatever needs to resolve rule
//! codes, typically [`ModelDefinition::build`](crate::definition::ModelDefinition::build).
//! Built-in and caller-registered rules are resolved the same way; adding a
//! new rule kind never touches the engine.

use crate::core::{EnumType, Number, Rule, Value};
use crate::model::DefinitionError;
use crate::rules::{
    not_equals, BeginsWith, Contains, InRange, IsEnum, Lowercase, MaxLength, MaxValue, MinLength,
    MinValue, NotIn, OneOf, Pattern, Trim,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Builds a rule from its JSON parameters.
pub type RuleFactory =
    Arc<dyn Fn(&serde_json::Value) -> Result<Arc<dyn Rule>, DefinitionError> + Send + Sync>;

/// Rule codes and the factories that build them.
///
/// # Example
///
/// ```rust
/// use modelguard::core::{Rule, Value};
/// use modelguard::registry::RuleRegistry;
/// use modelguard::rules::Custom;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut registry = RuleRegistry::with_builtins();
/// registry.register("even", |_params: &serde_json::Value| {
///     let rule: Arc<dyn Rule> = Arc::new(Custom::predicate(
///         "even",
///         |v: &Value| v.as_i64().is_some_and(|n| n % 2 == 0),
///         "Value must be even",
///     ));
///     Ok(rule)
/// });
///
/// let min = registry.create("min_value", &json!({"value": 3})).unwrap();
/// assert!(min.evaluate(&Value::from(5)).is_pass());
/// assert!(!registry.create("even", &json!(null)).unwrap().evaluate(&Value::from(5)).is_pass());
/// ```
#[derive(Clone, Default)]
pub struct RuleRegistry {
    factories: BTreeMap<String, RuleFactory>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with every built-in rule.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("min_value", |p: &serde_json::Value| {
                let p: BoundParams = parse("min_value", p)?;
                Ok(shared(if p.inclusive {
                    MinValue::new(p.value)
                } else {
                    MinValue::exclusive(p.value)
                }))
            })
            .register("max_value", |p: &serde_json::Value| {
                let p: BoundParams = parse("max_value", p)?;
                Ok(shared(if p.inclusive {
                    MaxValue::new(p.value)
                } else {
                    MaxValue::exclusive(p.value)
                }))
            })
            .register("in_range", |p: &serde_json::Value| {
                let p: RangeParams = parse("in_range", p)?;
                Ok(shared(InRange::new(
                    p.min,
                    p.max,
                    p.min_inclusive,
                    p.max_inclusive,
                )?))
            })
            .register("min_length", |p: &serde_json::Value| {
                let p: LengthParams = parse("min_length", p)?;
                Ok(shared(MinLength::new(p.value)))
            })
            .register("max_length", |p: &serde_json::Value| {
                let p: LengthParams = parse("max_length", p)?;
                Ok(shared(MaxLength::new(p.value)))
            })
            .register("contains", |p: &serde_json::Value| {
                let p: TextParams = parse("contains", p)?;
                Ok(shared(if p.ignore_case {
                    Contains::ignore_case(p.value)
                } else {
                    Contains::new(p.value)
                }))
            })
            .register("begins_with", |p: &serde_json::Value| {
                let p: TextParams = parse("begins_with", p)?;
                Ok(shared(if p.ignore_case {
                    BeginsWith::ignore_case(p.value)
                } else {
                    BeginsWith::new(p.value)
                }))
            })
            .register("pattern", |p: &serde_json::Value| {
                let p: TextParams = parse("pattern", p)?;
                Ok(shared(Pattern::new(&p.value)?))
            })
            .register("one_of", |p: &serde_json::Value| {
                let p: SetParams = parse("one_of", p)?;
                let rule = OneOf::new(p.values)?;
                Ok(shared(if p.ignore_case { rule.ignore_case() } else { rule }))
            })
            .register("not_in", |p: &serde_json::Value| {
                let p: SetParams = parse("not_in", p)?;
                let rule = NotIn::new(p.values)?;
                Ok(shared(if p.ignore_case { rule.ignore_case() } else { rule }))
            })
            .register("is_enum", |p: &serde_json::Value| {
                let p: EnumParams = parse("is_enum", p)?;
                Ok(shared(IsEnum::new(EnumType::new(p.name, p.members))?))
            })
            .register("not_equals", |p: &serde_json::Value| {
                let p: ValueParams = parse("not_equals", p)?;
                Ok(shared(not_equals("not_equals", p.value)))
            })
            .register("trim", |_: &serde_json::Value| Ok(shared(Trim)))
            .register("lowercase", |_: &serde_json::Value| Ok(shared(Lowercase)));
        registry
    }

    /// Register a factory under `code`, replacing any previous one.
    pub fn register<F>(&mut self, code: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&serde_json::Value) -> Result<Arc<dyn Rule>, DefinitionError> + Send + Sync + 'static,
    {
        let code = code.into();
        let replaced = self.factories.insert(code.clone(), Arc::new(factory)).is_some();
        debug!(code = %code, replaced, "Registered rule factory");
        self
    }

    /// Build the rule registered under `code`.
    pub fn create(
        &self,
        code: &str,
        params: &serde_json::Value,
    ) -> Result<Arc<dyn Rule>, DefinitionError> {
        let factory = self
            .factories
            .get(code)
            .ok_or_else(|| DefinitionError::UnknownRule {
                code: code.to_string(),
            })?;
        factory(params)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.factories.contains_key(code)
    }

    /// Registered codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("codes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn shared<R: Rule + 'static>(rule: R) -> Arc<dyn Rule> {
    Arc::new(rule)
}

fn parse<T: DeserializeOwned>(rule: &str, params: &serde_json::Value) -> Result<T, DefinitionError> {
    serde_json::from_value(params.clone()).map_err(|e| DefinitionError::InvalidParameter {
        rule: rule.to_string(),
        reason: e.to_string(),
    })
}

fn inclusive() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BoundParams {
    value: Number,
    #[serde(default = "inclusive")]
    inclusive: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeParams {
    min: Number,
    max: Number,
    #[serde(default = "inclusive")]
    min_inclusive: bool,
    #[serde(default = "inclusive")]
    max_inclusive: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LengthParams {
    value: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TextParams {
    value: String,
    #[serde(default)]
    ignore_case: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetParams {
    values: Vec<Value>,
    #[serde(default)]
    ignore_case: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumParams {
    name: String,
    members: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ValueParams {
    value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Outcome;
    use crate::rules::Custom;
    use serde_json::json;

    #[test]
    fn builtins_are_registered() {
        let registry = RuleRegistry::with_builtins();

        for code in [
            "min_value",
            "max_value",
            "in_range",
            "min_length",
            "max_length",
            "contains",
            "begins_with",
            "pattern",
            "one_of",
            "not_in",
            "is_enum",
            "not_equals",
            "trim",
            "lowercase",
        ] {
            assert!(registry.contains(code), "missing built-in {code}");
        }
        assert!(RuleRegistry::new().is_empty());
    }

    #[test]
    fn exclusive_bound_from_params() {
        let registry = RuleRegistry::with_builtins();
        let rule = registry
            .create("min_value", &json!({"value": 18, "inclusive": false}))
            .unwrap();

        assert!(!rule.evaluate(&Value::from(18)).is_pass());
        assert!(rule.evaluate(&Value::from(19)).is_pass());
    }

    #[test]
    fn membership_params_parse_mixed_values() {
        let registry = RuleRegistry::with_builtins();
        let rule = registry
            .create("one_of", &json!({"values": ["Admin", "Editor"], "ignore_case": true}))
            .unwrap();

        assert!(rule.evaluate(&Value::from("admin")).is_pass());
        assert!(!rule.evaluate(&Value::from("owner")).is_pass());
    }

    #[test]
    fn unknown_code_is_reported() {
        let result = RuleRegistry::with_builtins().create("is_prime", &json!(null));

        assert_eq!(
            result.unwrap_err(),
            DefinitionError::UnknownRule {
                code: "is_prime".to_string()
            }
        );
    }

    #[test]
    fn malformed_params_are_invalid_parameters() {
        let registry = RuleRegistry::with_builtins();

        assert!(matches!(
            registry.create("min_length", &json!({"value": "three"})),
            Err(DefinitionError::InvalidParameter { .. })
        ));
        assert!(matches!(
            registry.create("max_value", &json!({"value": 3, "extra": true})),
            Err(DefinitionError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rule_level_errors_pass_through() {
        let registry = RuleRegistry::with_builtins();

        assert!(matches!(
            registry.create("pattern", &json!({"value": "("})),
            Err(DefinitionError::InvalidPattern { .. })
        ));
        assert!(matches!(
            registry.create("not_in", &json!({"values": []})),
            Err(DefinitionError::EmptyMembership { .. })
        ));
    }

    #[test]
    fn custom_factories_sit_beside_builtins() {
        let mut registry = RuleRegistry::with_builtins();
        registry.register("multiple_of", |p: &serde_json::Value| {
            let step = p.get("step").and_then(|s| s.as_i64()).unwrap_or(1);
            let rule: Arc<dyn Rule> = Arc::new(Custom::predicate(
                "multiple_of",
                move |v: &Value| v.as_i64().is_some_and(|n| n % step == 0),
                format!("Value must be a multiple of {step}"),
            ));
            Ok(rule)
        });

        let rule = registry.create("multiple_of", &json!({"step": 5})).unwrap();
        assert_eq!(
            rule.evaluate(&Value::from(12)),
            Outcome::fail("Value must be a multiple of 5")
        );
        assert!(registry.codes().any(|code| code == "multiple_of"));
    }
}
