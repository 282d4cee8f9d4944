//! Builder for declaring a field and its rule chain.

use crate::core::{EnumType, FieldType, Number, Rule, Value};
use crate::model::{DefinitionError, FieldOptions, FieldSpec};
use crate::rules::{
    BeginsWith, Contains, Custom, InRange, IsEnum, Lowercase, MaxLength, MaxValue, MinLength,
    MinValue, NotIn, OneOf, Pattern, Trim,
};
use std::fmt::Display;
use std::sync::Arc;

/// Builder for a [`FieldSpec`] with a fluent API.
///
/// Rules run in the order they are added. Parameter errors (a bad regex,
/// an empty membership set) are held until [`FieldBuilder::build`], which
/// reports the first one.
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    options: FieldOptions,
    rules: Vec<Arc<dyn Rule>>,
    error: Option<DefinitionError>,
}

impl FieldBuilder {
    /// Start a required, non-nullable field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            options: FieldOptions::REQUIRED,
            rules: Vec::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absent input is accepted; no value is stored.
    pub fn optional(mut self) -> Self {
        self.options.required = false;
        self
    }

    /// Explicit null is accepted and skips the rule chain.
    pub fn nullable(mut self) -> Self {
        self.options.nullable = true;
        self
    }

    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Append any rule, built-in or custom.
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Append a rule that is already shared elsewhere.
    pub fn shared_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    fn try_rule<R: Rule + 'static>(self, rule: Result<R, DefinitionError>) -> Self {
        match rule {
            Ok(rule) => self.rule(rule),
            Err(e) => self.fail(e),
        }
    }

    fn fail(mut self, error: DefinitionError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    pub fn min_value(self, min: impl Into<Number>) -> Self {
        self.rule(MinValue::new(min))
    }

    pub fn min_value_exclusive(self, min: impl Into<Number>) -> Self {
        self.rule(MinValue::exclusive(min))
    }

    pub fn max_value(self, max: impl Into<Number>) -> Self {
        self.rule(MaxValue::new(max))
    }

    pub fn max_value_exclusive(self, max: impl Into<Number>) -> Self {
        self.rule(MaxValue::exclusive(max))
    }

    /// Inclusive on both ends.
    pub fn in_range(self, min: impl Into<Number>, max: impl Into<Number>) -> Self {
        self.try_rule(InRange::inclusive(min, max))
    }

    pub fn in_range_with(
        self,
        min: impl Into<Number>,
        max: impl Into<Number>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        self.try_rule(InRange::new(min, max, min_inclusive, max_inclusive))
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(MinLength::new(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(MaxLength::new(max))
    }

    pub fn contains(self, substring: impl Into<String>) -> Self {
        self.rule(Contains::new(substring))
    }

    pub fn contains_ignore_case(self, substring: impl Into<String>) -> Self {
        self.rule(Contains::ignore_case(substring))
    }

    pub fn begins_with(self, prefix: impl Into<String>) -> Self {
        self.rule(BeginsWith::new(prefix))
    }

    pub fn begins_with_ignore_case(self, prefix: impl Into<String>) -> Self {
        self.rule(BeginsWith::ignore_case(prefix))
    }

    pub fn pattern(self, pattern: &str) -> Self {
        self.try_rule(Pattern::new(pattern))
    }

    pub fn one_of<I, V>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_rule(OneOf::new(allowed))
    }

    pub fn one_of_ignore_case<I, V>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_rule(OneOf::new(allowed).map(OneOf::ignore_case))
    }

    pub fn not_in<I, V>(self, forbidden: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_rule(NotIn::new(forbidden))
    }

    pub fn not_in_ignore_case<I, V>(self, forbidden: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.try_rule(NotIn::new(forbidden).map(NotIn::ignore_case))
    }

    pub fn is_enum(self, kind: EnumType) -> Self {
        self.try_rule(IsEnum::new(kind))
    }

    pub fn trim(self) -> Self {
        self.rule(Trim)
    }

    pub fn lowercase(self) -> Self {
        self.rule(Lowercase)
    }

    /// Add a custom rule from a fallible, possibly transforming closure.
    pub fn custom<F, E>(self, code: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, E> + Send + Sync + 'static,
        E: Display,
    {
        self.rule(Custom::new(code, check))
    }

    /// Add a simple predicate rule with a fixed error message.
    pub fn require<F>(self, code: impl Into<String>, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rule(Custom::predicate(code, predicate, message))
    }

    /// Build the field.
    /// Returns the first parameter error, or any chain-level misconfiguration.
    pub fn build(self) -> Result<FieldSpec, DefinitionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        FieldSpec::new(self.name, self.field_type, self.options, self.rules)
    }
}
