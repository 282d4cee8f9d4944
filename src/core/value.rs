//! Untyped candidate values flowing through rule chains.
//!
//! A [`Value`] is what a caller hands the engine for one field and what a
//! validated instance hands back. It is deliberately small: scalars, lists
//! and string-keyed maps, enough to carry already-extracted record data.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// An untyped scalar or collection value.
///
/// `Null` exists so a nullable field can carry an explicit null as its
/// validated value. Raw input never stores `Null` as a present value; see
/// [`RawInput`](crate::core::RawInput).
///
/// # Example
///
/// ```rust
/// use modelguard::core::Value;
///
/// let age = Value::from(25);
/// assert_eq!(age.type_name(), "integer");
/// assert_eq!(Value::from("Shanyu").as_str(), Some("Shanyu"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the runtime type, used in type-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::to_f64)
    }

    /// Numeric view of the value; integers and reals both qualify.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(n) => Some(Number::Int(*n)),
            Self::Real(r) => Some(Number::Real(*r)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Value equality as used by membership checks: integers and reals
    /// compare numerically (`0 ~ 0.0`), lists and maps element-wise.
    pub fn equivalent(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(_) | Self::Real(_), Self::Int(_) | Self::Real(_)) => {
                self.as_number() == other.as_number()
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.equivalent(vb))
            }
            _ => self == other,
        }
    }

    /// Case-folded equality for strings, [`Value::equivalent`] otherwise.
    pub fn eq_ignore_case(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => self.equivalent(other),
        }
    }

    /// Short rendering used inside failure messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Str(s) => format!("'{s}'"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.describe())?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {}", item.describe())?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

/// JSON has no representation for non-finite reals, so `NaN` and the
/// infinities become `null`. Declared `real` fields never hold them; only
/// `any` fields can.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::from(n),
            Value::Real(r) => serde_json::Number::from_f64(r)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, item.into()))
                    .collect(),
            ),
        }
    }
}

/// A numeric bound or candidate. Integers compare exactly against each
/// other; any comparison involving a real goes through `f64`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Real(r) => r,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Real(r) => r.is_finite(),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{r}"),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        match value {
            Number::Int(n) => Value::Int(n),
            Number::Real(r) => Value::Real(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names_cover_every_variant() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(1).type_name(), "integer");
        assert_eq!(Value::from(1.5).type_name(), "real");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(vec![1, 2]).type_name(), "list");
        assert_eq!(Value::Map(BTreeMap::new()).type_name(), "map");
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert!(Number::Int(3) < Number::Real(3.5));
        assert!(Number::Real(2.0) == Number::Int(2));
        assert!(Number::Int(i64::MAX) > Number::Int(i64::MAX - 1));
    }

    #[test]
    fn json_integers_stay_integers() {
        assert_eq!(Value::from(json!(42)), Value::Int(42));
        assert_eq!(Value::from(json!(4.5)), Value::Real(4.5));
        assert_eq!(
            Value::from(json!(["a", null])),
            Value::List(vec![Value::from("a"), Value::Null])
        );
    }

    #[test]
    fn describe_quotes_strings_only() {
        assert_eq!(Value::from("abc").describe(), "'abc'");
        assert_eq!(Value::from(7).describe(), "7");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "['a', 'b']");
    }

    #[test]
    fn case_insensitive_equality_only_folds_strings() {
        assert!(Value::from("Admin").eq_ignore_case(&Value::from("admin")));
        assert!(!Value::from(1).eq_ignore_case(&Value::from(2)));
        assert!(Value::from(2).eq_ignore_case(&Value::from(2.0)));
    }

    #[test]
    fn equivalence_crosses_integer_and_real() {
        assert!(Value::from(0).equivalent(&Value::from(0.0)));
        assert!(Value::from(2.0).equivalent(&Value::from(2)));
        assert!(!Value::from(2.5).equivalent(&Value::from(2)));
        assert!(Value::from(vec![1, 2]).equivalent(&Value::List(vec![Value::from(1.0), Value::from(2)])));
        assert!(!Value::from("1").equivalent(&Value::from(1)));
        assert!(!Value::from(f64::NAN).equivalent(&Value::from(f64::NAN)));
    }

    #[test]
    fn non_finite_reals_serialize_as_null() {
        assert_eq!(serde_json::Value::from(Value::from(f64::INFINITY)), json!(null));
        assert!(!Number::Real(f64::NAN).is_finite());
        assert!(Number::Int(i64::MIN).is_finite());
    }
}
