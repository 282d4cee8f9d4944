//! Builder for freezing a model from its fields.

use crate::builder::field::FieldBuilder;
use crate::model::{DefinitionError, FieldSpec, ModelSpec};

/// Builder for a [`ModelSpec`] with a fluent API.
///
/// Fields keep the order they are added in; that order is the processing
/// order during construction.
pub struct ModelBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    error: Option<DefinitionError>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            error: None,
        }
    }

    /// Add a field using a builder.
    /// A field that fails to build is reported by [`ModelBuilder::build`].
    pub fn field(mut self, builder: FieldBuilder) -> Self {
        match builder.build() {
            Ok(field) => self.fields.push(field),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Add a field using a builder, failing immediately if it is invalid.
    pub fn try_field(mut self, builder: FieldBuilder) -> Result<Self, DefinitionError> {
        self.fields.push(builder.build()?);
        Ok(self)
    }

    /// Add a pre-built field.
    pub fn add_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields at once.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Freeze the model.
    /// Returns the first field error, or a model-level error such as a
    /// duplicated field name.
    pub fn build(self) -> Result<ModelSpec, DefinitionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        ModelSpec::new(self.name, self.fields)
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new("Model")
    }
}
