//! Raw, unvalidated input for a single construction call.

use super::value::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Three-state view of one field's raw entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawEntry<'a> {
    /// Key not supplied at all
    Absent,

    /// Key supplied with an explicit null
    Null,

    /// Key supplied with a non-null value
    Present(&'a Value),
}

/// Errors adapting external data into a [`RawInput`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("Raw input must be an object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Mapping from field name to raw value for one construction call.
///
/// Absent keys, explicit nulls and present values are distinct; the engine
/// treats each differently.
///
/// # Example
///
/// ```rust
/// use modelguard::core::{RawEntry, RawInput, Value};
///
/// let input = RawInput::new().with("age", 13).with_null("nickname");
///
/// assert_eq!(input.entry("age"), RawEntry::Present(&Value::from(13)));
/// assert_eq!(input.entry("nickname"), RawEntry::Null);
/// assert_eq!(input.entry("email"), RawEntry::Absent);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawInput {
    entries: BTreeMap<String, Value>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a value for `field`. Supplying [`Value::Null`] is the same as
    /// [`RawInput::with_null`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Supply an explicit null for `field`.
    pub fn with_null(mut self, field: impl Into<String>) -> Self {
        self.entries.insert(field.into(), Value::Null);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(field.into(), value.into());
    }

    /// Drop a key so that it reads as absent again.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.entries.remove(field)
    }

    pub fn entry(&self, field: &str) -> RawEntry<'_> {
        match self.entries.get(field) {
            None => RawEntry::Absent,
            Some(Value::Null) => RawEntry::Null,
            Some(value) => RawEntry::Present(value),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adapt an already-parsed JSON object. JSON `null` becomes an explicit
    /// null entry; missing keys stay absent.
    pub fn from_json(value: serde_json::Value) -> Result<Self, InputError> {
        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(InputError::NotAnObject {
                found: Value::from(other).type_name(),
            }),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn three_states_are_distinct() {
        let input = RawInput::new().with("a", 1).with_null("b");

        assert!(matches!(input.entry("a"), RawEntry::Present(_)));
        assert_eq!(input.entry("b"), RawEntry::Null);
        assert_eq!(input.entry("c"), RawEntry::Absent);
    }

    #[test]
    fn null_value_reads_as_null_entry() {
        let input = RawInput::new().with("a", Value::Null);
        assert_eq!(input.entry("a"), RawEntry::Null);
    }

    #[test]
    fn from_json_object() {
        let input = RawInput::from_json(json!({"age": 13, "nickname": null})).unwrap();

        assert_eq!(input.entry("age"), RawEntry::Present(&Value::Int(13)));
        assert_eq!(input.entry("nickname"), RawEntry::Null);
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        let err = RawInput::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(err, InputError::NotAnObject { found: "list" });
    }

    #[test]
    fn remove_makes_entry_absent() {
        let mut input = RawInput::new().with("a", 1);
        input.remove("a");
        assert_eq!(input.entry("a"), RawEntry::Absent);
        assert!(input.is_empty());
    }
}
