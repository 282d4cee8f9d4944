//! Frozen field and model specifications.

use crate::core::{FieldType, Limits, Number, RawInput, Rule};
use crate::engine::{self, AggregateFailure, ValidatedInstance};
use crate::model::error::DefinitionError;
use std::collections::HashSet;
use std::sync::Arc;

/// Presence and nullability flags for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldOptions {
    pub required: bool,
    pub nullable: bool,
}

impl FieldOptions {
    pub const REQUIRED: Self = Self {
        required: true,
        nullable: false,
    };

    pub const OPTIONAL: Self = Self {
        required: false,
        nullable: false,
    };

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self::REQUIRED
    }
}

/// One declared field: name, type, flags and an ordered rule chain.
///
/// The chain is evaluated in exactly the order given here.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    options: FieldOptions,
    rules: Vec<Arc<dyn Rule>>,
}

impl FieldSpec {
    /// Declare a field, rejecting rules that could never apply to the
    /// declared type and bounds that contradict each other.
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        options: FieldOptions,
        rules: Vec<Arc<dyn Rule>>,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        if let Some(reason) = field_type.definition_error() {
            return Err(DefinitionError::InvalidType {
                field: name,
                reason,
            });
        }

        for rule in &rules {
            if !field_type.supports(rule.operand()) {
                return Err(DefinitionError::IncompatibleRule {
                    field: name,
                    rule: rule.code().to_string(),
                    declared: field_type.to_string(),
                });
            }
        }

        check_limits(&name, &rules)?;

        Ok(Self {
            name,
            field_type,
            options,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.options.required
    }

    pub fn is_nullable(&self) -> bool {
        self.options.nullable
    }

    pub fn options(&self) -> FieldOptions {
        self.options
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Rule codes in chain order.
    pub fn rule_codes(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.code()).collect()
    }
}

fn tightest<T: Copy>(values: impl Iterator<Item = T>, keep_new: impl Fn(T, T) -> bool) -> Option<T> {
    values.fold(None, |best, next| match best {
        Some(current) if !keep_new(next, current) => Some(current),
        _ => Some(next),
    })
}

fn check_limits(field: &str, rules: &[Arc<dyn Rule>]) -> Result<(), DefinitionError> {
    let limits: Vec<Limits> = rules.iter().map(|rule| rule.limits()).collect();

    for (rule, limit) in rules.iter().zip(&limits) {
        for bound in [limit.min_value, limit.max_value].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(DefinitionError::InvalidParameter {
                    rule: rule.code().to_string(),
                    reason: format!("bound {bound} on field '{field}' is not a finite number"),
                });
            }
        }
    }

    // (bound, exclusive); on a tie the exclusive bound is the tighter one.
    let lower: Option<(Number, bool)> = tightest(
        limits
            .iter()
            .filter_map(|l| l.min_value.map(|v| (v, l.min_exclusive))),
        |(a, a_excl), (b, b_excl)| a > b || (a == b && a_excl && !b_excl),
    );
    let upper: Option<(Number, bool)> = tightest(
        limits
            .iter()
            .filter_map(|l| l.max_value.map(|v| (v, l.max_exclusive))),
        |(a, a_excl), (b, b_excl)| a < b || (a == b && a_excl && !b_excl),
    );
    if let (Some((lower, lower_excl)), Some((upper, upper_excl))) = (lower, upper) {
        if lower > upper {
            return Err(DefinitionError::ConflictingBounds {
                field: field.to_string(),
                detail: format!("minimum value {lower} is greater than maximum value {upper}"),
            });
        }
        if lower == upper && (lower_excl || upper_excl) {
            return Err(DefinitionError::ConflictingBounds {
                field: field.to_string(),
                detail: format!(
                    "minimum value {lower} and maximum value {upper} admit no value when either is exclusive"
                ),
            });
        }
    }

    let shortest = tightest(limits.iter().filter_map(|l| l.min_length), |a, b| a > b);
    let longest = tightest(limits.iter().filter_map(|l| l.max_length), |a, b| a < b);
    if let (Some(shortest), Some(longest)) = (shortest, longest) {
        if shortest > longest {
            return Err(DefinitionError::ConflictingBounds {
                field: field.to_string(),
                detail: format!(
                    "minimum length {shortest} is greater than maximum length {longest}"
                ),
            });
        }
    }

    Ok(())
}

/// The frozen definition of a record: a name and its ordered fields.
///
/// Built once, then shared read-only by any number of concurrent
/// construction calls. Cloning is cheap.
///
/// # Example
///
/// ```rust
/// use modelguard::core::{FieldType, RawInput};
/// use modelguard::model::{FieldOptions, FieldSpec, ModelSpec};
/// use modelguard::rules::{MaxValue, MinValue};
/// use std::sync::Arc;
///
/// let user_id = FieldSpec::new(
///     "user_id",
///     FieldType::Integer,
///     FieldOptions::REQUIRED,
///     vec![Arc::new(MinValue::new(21)), Arc::new(MaxValue::new(100))],
/// )
/// .unwrap();
/// let spec = ModelSpec::new("UserService", vec![user_id]).unwrap();
///
/// let instance = spec.construct(&RawInput::new().with("user_id", 25)).unwrap();
/// assert_eq!(instance.get("user_id").unwrap().and_then(|v| v.as_i64()), Some(25));
/// ```
#[derive(Clone, Debug)]
pub struct ModelSpec {
    name: Arc<str>,
    fields: Arc<[FieldSpec]>,
}

impl ModelSpec {
    /// Freeze a model. Field names must be unique; zero fields is allowed.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self, DefinitionError> {
        let name: String = name.into();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(DefinitionError::DuplicateFieldName {
                    model: name,
                    field: field.name().to_string(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            fields: fields.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub(crate) fn shared_fields(&self) -> Arc<[FieldSpec]> {
        Arc::clone(&self.fields)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate one raw input against this model.
    pub fn construct(&self, input: &RawInput) -> Result<ValidatedInstance, AggregateFailure> {
        engine::construct(self, input)
    }
}

// Rules are opaque, so two specs are equal only when they share one frozen field list.
impl PartialEq for ModelSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.fields, &other.fields)
    }
}
