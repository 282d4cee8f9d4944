//! Declared semantic types and the type gate applied before a rule chain.

use super::input::RawInput;
use super::rule::Operand;
use super::value::Value;
use crate::model::ModelSpec;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A named, closed set of allowed values.
///
/// # Example
///
/// ```rust
/// use modelguard::core::{EnumType, Value};
///
/// let role = EnumType::new("UserRole", ["admin", "editor", "viewer"]);
/// assert!(role.contains(&Value::from("editor")));
/// assert!(!role.contains(&Value::from("owner")));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    name: Arc<str>,
    members: Arc<[Value]>,
}

impl EnumType {
    pub fn new<I, V>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let name: String = name.into();
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an enum type from Rust enum variants, using each variant's
    /// serde representation as the member value.
    pub fn from_variants<T: Serialize>(
        name: impl Into<String>,
        variants: &[T],
    ) -> Result<Self, serde_json::Error> {
        let members = variants
            .iter()
            .map(|variant| serde_json::to_value(variant).map(Value::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, members))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Value] {
        &self.members
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|member| member.equivalent(value))
    }

    /// Members rendered for failure messages, e.g. `'admin', 'editor'`.
    pub fn describe_members(&self) -> String {
        describe_set(&self.members)
    }
}

pub(crate) fn describe_set(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::describe)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Semantic type tag declared on a field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    Integer,
    /// Accepts integers as well as finite reals; the value is not widened.
    Real,
    String,
    Boolean,
    EnumOf(EnumType),
    /// Homogeneous list whose items are checked against the inner type.
    List(Box<FieldType>),
    /// String-keyed map whose values are checked against the inner type.
    Map(Box<FieldType>),
    /// Admits a value matching any member type, tried in declared order.
    Union(Vec<FieldType>),
    /// A nested model. The value must be a map that constructs cleanly.
    Model(ModelSpec),
    Any,
}

/// Why a present value failed the type gate.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeMismatch {
    pub expected: String,
    pub actual: &'static str,
    pub detail: String,
}

impl FieldType {
    pub fn list_of(item: FieldType) -> Self {
        Self::List(Box::new(item))
    }

    pub fn map_of(value: FieldType) -> Self {
        Self::Map(Box::new(value))
    }

    pub fn union_of(members: impl IntoIterator<Item = FieldType>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Whether a rule over `operand` can ever see a value of this type.
    pub fn supports(&self, operand: Operand) -> bool {
        match (self, operand) {
            (Self::Any, _) | (_, Operand::Any) => true,
            (Self::Union(members), _) => members.iter().any(|member| member.supports(operand)),
            (_, Operand::Numeric) => self.is_numeric(),
            (_, Operand::Text) => self.is_textual(),
        }
    }

    /// A reason this type can never admit anything, if there is one.
    pub fn definition_error(&self) -> Option<String> {
        match self {
            Self::Union(members) if members.is_empty() => {
                Some("a union needs at least one member type".to_string())
            }
            Self::Union(members) => members.iter().find_map(Self::definition_error),
            Self::List(inner) | Self::Map(inner) => inner.definition_error(),
            _ => None,
        }
    }

    /// Pure type gate. Null never reaches here; the engine resolves it first.
    pub fn check(&self, value: &Value) -> Result<(), TypeMismatch> {
        self.admit(value).map(|_| ())
    }

    /// Type gate that also yields the value the rule chain starts from.
    ///
    /// Scalars come back unchanged. Nested models come back as the map of
    /// their validated (possibly transformed) fields, and lists and maps
    /// carry their admitted items.
    pub fn admit(&self, value: &Value) -> Result<Value, TypeMismatch> {
        match (self, value) {
            (Self::Any, _)
            | (Self::Integer, Value::Int(_))
            | (Self::Real, Value::Int(_))
            | (Self::String, Value::Str(_))
            | (Self::Boolean, Value::Bool(_)) => Ok(value.clone()),
            (Self::Real, Value::Real(r)) if r.is_finite() => Ok(value.clone()),
            (Self::Real, Value::Real(_)) => Err(self.mismatch(
                value,
                format!("Expected a finite real, got {}", value.describe()),
            )),
            (Self::EnumOf(kind), candidate) if kind.contains(candidate) => Ok(value.clone()),
            (Self::List(item), Value::List(items)) => items
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    item.admit(element).map_err(|inner| {
                        self.mismatch(value, format!("Item at index {i}: {}", inner.detail))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (Self::Map(inner), Value::Map(entries)) => entries
                .iter()
                .map(|(key, entry)| {
                    inner
                        .admit(entry)
                        .map(|admitted| (key.clone(), admitted))
                        .map_err(|e| self.mismatch(value, format!("Entry '{key}': {}", e.detail)))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Value::Map),
            (Self::Union(members), _) => members
                .iter()
                .find_map(|member| member.admit(value).ok())
                .ok_or_else(|| {
                    let names: Vec<String> = members.iter().map(ToString::to_string).collect();
                    self.mismatch(
                        value,
                        format!(
                            "Expected one of types [{}], got {} with value: {}",
                            names.join(", "),
                            value.type_name(),
                            value.describe()
                        ),
                    )
                }),
            (Self::Model(spec), Value::Map(entries)) => {
                let input: RawInput = entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                spec.construct(&input)
                    .map(|instance| instance.to_value())
                    .map_err(|report| {
                        let failures: Vec<String> = report
                            .iter()
                            .map(|failure| format!("{}: {}", failure.field, failure.message))
                            .collect();
                        self.mismatch(
                            value,
                            format!(
                                "Nested model '{}' is invalid: {}",
                                spec.name(),
                                failures.join("; ")
                            ),
                        )
                    })
            }
            (Self::EnumOf(kind), _) => Err(self.mismatch(
                value,
                format!(
                    "Value {} is not a valid {} value. Valid values are: {}",
                    value.describe(),
                    kind.name(),
                    kind.describe_members()
                ),
            )),
            _ => Err(self.mismatch(
                value,
                format!(
                    "Expected type {self}, got {} with value: {}",
                    value.type_name(),
                    value.describe()
                ),
            )),
        }
    }

    fn mismatch(&self, value: &Value, detail: String) -> TypeMismatch {
        TypeMismatch {
            expected: self.to_string(),
            actual: value.type_name(),
            detail,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Real => f.write_str("real"),
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
            Self::EnumOf(kind) => write!(f, "enum {}", kind.name()),
            Self::List(item) => write!(f, "list<{item}>"),
            Self::Map(value) => write!(f, "map<{value}>"),
            Self::Union(members) => {
                let names: Vec<String> = members.iter().map(ToString::to_string).collect();
                f.write_str(&names.join(" | "))
            }
            Self::Model(spec) => write!(f, "model {}", spec.name()),
            Self::Any => f.write_str("any"),
        }
    }
}
