//! Validated instances and field access.

use crate::core::Value;
use crate::model::FieldSpec;
use std::sync::Arc;
use thiserror::Error;

/// Programmer errors raised by instance accessors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    #[error("Model '{model}' has no field named '{field}'")]
    UnknownField { model: String, field: String },
}

/// The successful result of construction.
///
/// Holds the final, possibly transformed value of every field that was
/// supplied. Reading a field never re-runs validation.
#[derive(Clone, Debug)]
pub struct ValidatedInstance {
    model: Arc<str>,
    fields: Arc<[FieldSpec]>,
    values: Vec<Option<Value>>,
}

impl ValidatedInstance {
    /// `values` is parallel to `fields`; `None` marks an absent optional field.
    pub(crate) fn new(model: Arc<str>, fields: Arc<[FieldSpec]>, values: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(fields.len(), values.len());
        Self {
            model,
            fields,
            values,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Look up a field's validated value.
    ///
    /// Returns `Ok(None)` for an optional field that was absent, and
    /// `Ok(Some(&Value::Null))` for a nullable field given an explicit null.
    /// Fails only when `field` was never declared on the model.
    pub fn get(&self, field: &str) -> Result<Option<&Value>, AccessError> {
        let index = self
            .fields
            .iter()
            .position(|spec| spec.name() == field)
            .ok_or_else(|| AccessError::UnknownField {
                model: self.model.to_string(),
                field: field.to_string(),
            })?;

        Ok(self.values[index].as_ref())
    }

    pub fn contains(&self, field: &str) -> bool {
        matches!(self.get(field), Ok(Some(_)))
    }

    /// Present fields in model order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .zip(&self.values)
            .filter_map(|(spec, value)| value.as_ref().map(|v| (spec.name(), v)))
    }

    /// Number of fields that carry a value (absent optional fields excluded).
    pub fn len(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present fields as a map value, the form a nested model takes inside
    /// its parent.
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    /// JSON object of the present fields.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(name, value)| (name.to_string(), serde_json::Value::from(value.clone())))
                .collect(),
        )
    }
}

impl PartialEq for ValidatedInstance {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.iter().eq(other.iter())
    }
}
