//! Declarative model definitions loadable from JSON.
//!
//! A definition is plain data: field names, declared types, flags and rule
//! codes with parameters. Turning it into a [`ModelSpec`] resolves every
//! rule code through a [`RuleRegistry`] and runs the same definition-time
//! checks as the builders.
//!
//! ```json
//! {
//!   "name": "User",
//!   "fields": [
//!     {"name": "age", "type": "integer", "rules": [{"rule": "min_value", "params": {"value": 13}}]},
//!     {"name": "nickname", "type": "string", "required": false, "nullable": true,
//!      "rules": [{"rule": "not_in", "params": {"values": ["Shanyu"]}}]}
//!   ]
//! }
//! ```

use crate::core::{EnumType, FieldType, Value};
use crate::model::{DefinitionError, FieldOptions, FieldSpec, ModelSpec};
use crate::registry::RuleRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_required() -> bool {
    true
}

/// A whole model: its name and ordered fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// One field. `required` defaults to true and `nullable` to false.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeDefinition,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A declared type.
///
/// Scalars are written as bare strings (`"integer"`); compound types as a
/// single-key object (`{"list": {"items": "string"}}`,
/// `{"union": ["integer", "string"]}`, `{"map": {"values": "real"}}`,
/// or `{"model": {"name": "Address", "fields": [...]}}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDefinition {
    Integer,
    Real,
    String,
    Boolean,
    Any,
    List { items: Box<TypeDefinition> },
    Enum { name: String, members: Vec<Value> },
    Map { values: Box<TypeDefinition> },
    Union(Vec<TypeDefinition>),
    Model(ModelDefinition),
}

/// A rule code and its parameters. Parameters are interpreted by the
/// factory registered under the code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub rule: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ModelDefinition {
    pub fn from_json(json: serde_json::Value) -> Result<Self, DefinitionError> {
        serde_json::from_value(json).map_err(|e| DefinitionError::MalformedDefinition(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::MalformedDefinition(e.to_string()))
    }

    /// Resolve rule codes through `registry` and freeze the model.
    pub fn build(&self, registry: &RuleRegistry) -> Result<ModelSpec, DefinitionError> {
        debug!(
            model = %self.name,
            fields = self.fields.len(),
            "Building model from definition"
        );

        let fields = self
            .fields
            .iter()
            .map(|field| field.build(registry))
            .collect::<Result<Vec<_>, _>>()?;

        ModelSpec::new(self.name.clone(), fields)
    }
}

impl FieldDefinition {
    pub fn options(&self) -> FieldOptions {
        FieldOptions {
            required: self.required,
            nullable: self.nullable,
        }
    }

    pub fn build(&self, registry: &RuleRegistry) -> Result<FieldSpec, DefinitionError> {
        let rules = self
            .rules
            .iter()
            .map(|rule| registry.create(&rule.rule, &rule.params))
            .collect::<Result<Vec<_>, _>>()?;

        FieldSpec::new(
            self.name.clone(),
            self.field_type.to_field_type(registry)?,
            self.options(),
            rules,
        )
    }
}

impl TypeDefinition {
    /// Nested models are built through the same `registry` as their parent.
    pub fn to_field_type(&self, registry: &RuleRegistry) -> Result<FieldType, DefinitionError> {
        Ok(match self {
            Self::Integer => FieldType::Integer,
            Self::Real => FieldType::Real,
            Self::String => FieldType::String,
            Self::Boolean => FieldType::Boolean,
            Self::Any => FieldType::Any,
            Self::List { items } => FieldType::list_of(items.to_field_type(registry)?),
            Self::Enum { name, members } => {
                FieldType::EnumOf(EnumType::new(name.clone(), members.iter().cloned()))
            }
            Self::Map { values } => FieldType::map_of(values.to_field_type(registry)?),
            Self::Union(members) => FieldType::Union(
                members
                    .iter()
                    .map(|member| member.to_field_type(registry))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Model(definition) => FieldType::Model(definition.build(registry)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawInput;
    use crate::engine::FailureKind;
    use serde_json::json;

    fn user_definition() -> serde_json::Value {
        json!({
            "name": "User",
            "fields": [
                {"name": "age", "type": "integer",
                 "rules": [{"rule": "min_value", "params": {"value": 13}}]},
                {"name": "nickname", "type": "string", "required": false, "nullable": true,
                 "rules": [{"rule": "not_in", "params": {"values": ["Shanyu"]}}]},
                {"name": "tags", "type": {"list": {"items": "string"}}, "required": false},
                {"name": "role", "type": {"enum": {"name": "Role", "members": ["admin", "viewer"]}},
                 "required": false}
            ]
        })
    }

    #[test]
    fn definition_defaults_are_applied() {
        let definition = ModelDefinition::from_json(user_definition()).unwrap();

        assert!(definition.fields[0].required);
        assert!(!definition.fields[0].nullable);
        assert_eq!(definition.fields[0].rules[0].params, json!({"value": 13}));
        assert_eq!(
            definition.fields[2].field_type,
            TypeDefinition::List {
                items: Box::new(TypeDefinition::String)
            }
        );
    }

    #[test]
    fn built_definition_validates_like_a_builder_model() {
        let spec = ModelDefinition::from_json(user_definition())
            .unwrap()
            .build(&RuleRegistry::with_builtins())
            .unwrap();

        let report = spec
            .construct(&RawInput::new().with("age", 10).with("nickname", "Shanyu"))
            .unwrap_err();
        let fields: Vec<&str> = report.failures().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "nickname"]);

        let report = spec
            .construct(&RawInput::new().with("age", 20).with("role", "owner"))
            .unwrap_err();
        assert_eq!(report.failures()[0].kind, FailureKind::TypeMismatch);
    }

    #[test]
    fn unknown_rule_code_fails_the_build() {
        let definition = ModelDefinition::from_json(json!({
            "name": "User",
            "fields": [{"name": "age", "type": "integer", "rules": [{"rule": "is_prime"}]}]
        }))
        .unwrap();

        assert_eq!(
            definition.build(&RuleRegistry::with_builtins()).unwrap_err(),
            DefinitionError::UnknownRule {
                code: "is_prime".to_string()
            }
        );
    }

    #[test]
    fn malformed_documents_are_reported() {
        assert!(matches!(
            ModelDefinition::from_json_str("{\"name\": \"User\", \"fields\": [{\"name\": \"age\"}]}"),
            Err(DefinitionError::MalformedDefinition(_))
        ));
        assert!(matches!(
            ModelDefinition::from_json(json!({"name": "User", "fields": [
                {"name": "age", "type": "decimal"}
            ]})),
            Err(DefinitionError::MalformedDefinition(_))
        ));
    }

    #[test]
    fn compound_types_build_from_json() {
        let spec = ModelDefinition::from_json(json!({
            "name": "Customer",
            "fields": [
                {"name": "id", "type": {"union": ["integer", "string"]}},
                {"name": "scores", "type": {"map": {"values": "real"}}, "required": false},
                {"name": "address", "type": {"model": {
                    "name": "Address",
                    "fields": [
                        {"name": "city", "type": "string", "rules": [{"rule": "trim"}]},
                        {"name": "zip", "type": "string",
                         "rules": [{"rule": "pattern", "params": {"value": "^[0-9]{5}$"}}]}
                    ]
                }}}
            ]
        }))
        .unwrap()
        .build(&RuleRegistry::with_builtins())
        .unwrap();

        let input = RawInput::from_json(json!({
            "id": "c-17",
            "scores": {"q1": 2, "q2": 3.5},
            "address": {"city": " Oslo ", "zip": "01234"}
        }))
        .unwrap();
        let instance = spec.construct(&input).unwrap();
        assert_eq!(
            instance.to_json()["address"],
            json!({"city": "Oslo", "zip": "01234"})
        );

        let input = RawInput::from_json(json!({
            "id": true,
            "address": {"city": "Oslo", "zip": "12"}
        }))
        .unwrap();
        let report = spec.construct(&input).unwrap_err();
        assert_eq!(
            report.field("id").unwrap().message,
            "Expected one of types [integer, string], got boolean with value: true"
        );
        let address = report.field("address").unwrap();
        assert_eq!(address.kind, FailureKind::TypeMismatch);
        assert!(address
            .message
            .starts_with("Nested model 'Address' is invalid: zip: "));
    }

    #[test]
    fn nested_definition_errors_surface_from_the_parent() {
        let definition = ModelDefinition::from_json(json!({
            "name": "Customer",
            "fields": [{"name": "address", "type": {"model": {
                "name": "Address",
                "fields": [{"name": "zip", "type": "string", "rules": [{"rule": "zip_code"}]}]
            }}}]
        }))
        .unwrap();
        assert_eq!(
            definition.build(&RuleRegistry::with_builtins()).unwrap_err(),
            DefinitionError::UnknownRule {
                code: "zip_code".to_string()
            }
        );

        let definition = ModelDefinition::from_json(json!({
            "name": "Customer",
            "fields": [{"name": "id", "type": {"union": []}}]
        }))
        .unwrap();
        assert!(matches!(
            definition.build(&RuleRegistry::with_builtins()),
            Err(DefinitionError::InvalidType { .. })
        ));
    }

    #[test]
    fn incompatible_rule_from_definition_is_rejected() {
        let definition = ModelDefinition::from_json_str(
            r#"{"name": "Flags", "fields": [
                {"name": "active", "type": "boolean",
                 "rules": [{"rule": "pattern", "params": {"value": "^t"}}]}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(
            definition.build(&RuleRegistry::with_builtins()),
            Err(DefinitionError::IncompatibleRule { .. })
        ));
    }
}
