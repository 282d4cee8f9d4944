//! The construction protocol.
//!
//! For each field, in model order:
//!
//! 1. absent: `MissingRequired` if required, otherwise skipped
//! 2. null: validated as null if nullable (no rules run), otherwise `NullNotAllowed`
//! 3. present: type gate first (`TypeMismatch`), then the rule chain in
//!    declared order, stopping at the first failing rule (`RuleViolation`)
//!
//! Field outcomes are accumulated with `Validation`, so every failing field
//! is reported while each field reports at most one failure.

use crate::core::{Outcome, RawEntry, RawInput, Rule, Value};
use crate::engine::instance::ValidatedInstance;
use crate::engine::report::{AggregateFailure, FieldFailure};
use crate::model::{FieldSpec, ModelSpec};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, trace, warn};

/// Outcome for a single field. `Success(None)` is an absent optional field.
pub type FieldCheck = Validation<Option<Value>, NonEmptyVec<FieldFailure>>;

/// Validate `input` against `spec`.
///
/// Never panics for bad input: every expected validation problem is
/// returned as an [`AggregateFailure`] naming each invalid field.
pub fn construct(spec: &ModelSpec, input: &RawInput) -> Result<ValidatedInstance, AggregateFailure> {
    debug!(
        model = spec.name(),
        fields = spec.len(),
        supplied = input.len(),
        "Constructing model instance"
    );

    for key in input.keys() {
        if spec.field(key).is_none() {
            debug!(model = spec.name(), key, "Ignoring undeclared input key");
        }
    }

    let checks: Vec<FieldCheck> = spec
        .fields()
        .iter()
        .map(|field| check_field(field, input.entry(field.name())))
        .collect();

    match Validation::all_vec(checks) {
        Validation::Success(values) => {
            debug!(model = spec.name(), "Construction succeeded");
            Ok(ValidatedInstance::new(
                spec.shared_name(),
                spec.shared_fields(),
                values,
            ))
        }
        Validation::Failure(errors) => {
            let failures: Vec<FieldFailure> = errors.iter().cloned().collect();
            debug!(
                model = spec.name(),
                failures = failures.len(),
                "Construction failed"
            );
            Err(AggregateFailure::new(spec.name(), failures))
        }
    }
}

/// Resolve presence, nullability and type for one field, then run its chain.
pub fn check_field(field: &FieldSpec, entry: RawEntry<'_>) -> FieldCheck {
    let name = field.name();

    let value = match entry {
        RawEntry::Absent if field.is_required() => {
            trace!(field = name, "Required field is absent");
            return Validation::fail(FieldFailure::missing_required(name));
        }
        RawEntry::Absent => {
            trace!(field = name, "Optional field is absent; skipped");
            return Validation::success(None);
        }
        RawEntry::Null if field.is_nullable() => {
            trace!(field = name, "Nullable field is null; chain skipped");
            return Validation::success(Some(Value::Null));
        }
        RawEntry::Null => {
            trace!(field = name, "Null not allowed");
            return Validation::fail(FieldFailure::null_not_allowed(name));
        }
        RawEntry::Present(value) => value,
    };

    match field.field_type().admit(value) {
        Ok(admitted) => run_chain(field, admitted),
        Err(mismatch) => {
            trace!(
                field = name,
                expected = %mismatch.expected,
                actual = mismatch.actual,
                "Type mismatch; chain skipped"
            );
            Validation::fail(FieldFailure::type_mismatch(name, mismatch.detail))
        }
    }
}

/// Run rules in order, feeding each the previous rule's output.
fn run_chain(field: &FieldSpec, value: Value) -> FieldCheck {
    let mut current = value;

    for rule in field.rules() {
        match evaluate_contained(rule.as_ref(), &current) {
            Outcome::Pass(next) => current = next,
            Outcome::Fail(message) => {
                trace!(field = field.name(), rule = rule.code(), "Rule failed");
                return Validation::fail(FieldFailure::rule_violation(
                    field.name(),
                    rule.code(),
                    message,
                ));
            }
        }
    }

    Validation::success(Some(current))
}

/// Evaluate a rule, turning a panic inside it into a failed outcome.
pub fn evaluate_contained(rule: &dyn Rule, candidate: &Value) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(candidate))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(rule = rule.code(), %message, "Rule panicked during evaluation");
            Outcome::fail(format!("Rule '{}' failed unexpectedly: {message}", rule.code()))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
