//! Numeric bound rules: `min_value`, `max_value`, `in_range`.
//!
//! A candidate that does not compare with a bound (`NaN`) fails every
//! bound rule.

use crate::core::{Limits, Number, Operand, Outcome, Rule, Value};
use crate::model::DefinitionError;
use std::cmp::Ordering;

fn numeric(code: &str, candidate: &Value) -> Result<Number, Outcome> {
    candidate.as_number().ok_or_else(|| {
        Outcome::fail(format!(
            "Rule '{code}' expected a number, got {}",
            candidate.type_name()
        ))
    })
}

fn compare(value: Number, bound: Number) -> Result<Ordering, Outcome> {
    value.partial_cmp(&bound).ok_or_else(|| {
        Outcome::fail(format!("Value {value} cannot be compared with {bound}"))
    })
}

macro_rules! try_outcome {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(outcome) => return outcome,
        }
    };
}

/// Lower bound, inclusive unless built with [`MinValue::exclusive`].
///
/// A non-finite bound is accepted here and rejected when the field is
/// declared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinValue {
    min: Number,
    inclusive: bool,
}

impl MinValue {
    pub fn new(min: impl Into<Number>) -> Self {
        Self {
            min: min.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(min: impl Into<Number>) -> Self {
        Self {
            min: min.into(),
            inclusive: false,
        }
    }
}

impl Rule for MinValue {
    fn code(&self) -> &str {
        "min_value"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let value = try_outcome!(numeric(self.code(), candidate));

        match try_outcome!(compare(value, self.min)) {
            Ordering::Less if self.inclusive => Outcome::fail(format!(
                "Value {value} is less than the minimum value of {}",
                self.min
            )),
            Ordering::Less | Ordering::Equal if !self.inclusive => Outcome::fail(format!(
                "Value {value} is less than or equal to the minimum value of {} (exclusive)",
                self.min
            )),
            _ => Outcome::pass(candidate.clone()),
        }
    }

    fn operand(&self) -> Operand {
        Operand::Numeric
    }

    fn limits(&self) -> Limits {
        Limits {
            min_value: Some(self.min),
            min_exclusive: !self.inclusive,
            ..Limits::default()
        }
    }
}

/// Upper bound, inclusive unless built with [`MaxValue::exclusive`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaxValue {
    max: Number,
    inclusive: bool,
}

impl MaxValue {
    pub fn new(max: impl Into<Number>) -> Self {
        Self {
            max: max.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(max: impl Into<Number>) -> Self {
        Self {
            max: max.into(),
            inclusive: false,
        }
    }
}

impl Rule for MaxValue {
    fn code(&self) -> &str {
        "max_value"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let value = try_outcome!(numeric(self.code(), candidate));

        match try_outcome!(compare(value, self.max)) {
            Ordering::Greater if self.inclusive => Outcome::fail(format!(
                "Value {value} exceeds the maximum value of {}",
                self.max
            )),
            Ordering::Greater | Ordering::Equal if !self.inclusive => Outcome::fail(format!(
                "Value {value} is greater than or equal to the maximum value of {} (exclusive)",
                self.max
            )),
            _ => Outcome::pass(candidate.clone()),
        }
    }

    fn operand(&self) -> Operand {
        Operand::Numeric
    }

    fn limits(&self) -> Limits {
        Limits {
            max_value: Some(self.max),
            max_exclusive: !self.inclusive,
            ..Limits::default()
        }
    }
}

/// Two-sided bound with independent inclusivity on each end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InRange {
    min: Number,
    max: Number,
    min_inclusive: bool,
    max_inclusive: bool,
}

impl InRange {
    /// Fails with `InvalidParameter` when a bound is not finite or when no
    /// value can lie between the bounds.
    pub fn new(
        min: impl Into<Number>,
        max: impl Into<Number>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self, DefinitionError> {
        let (min, max) = (min.into(), max.into());
        let invalid = |reason: String| DefinitionError::InvalidParameter {
            rule: "in_range".to_string(),
            reason,
        };

        if !min.is_finite() || !max.is_finite() {
            return Err(invalid(format!("bounds {min} and {max} must be finite")));
        }
        if min > max {
            return Err(invalid(format!(
                "lower bound {min} is greater than upper bound {max}"
            )));
        }
        if min == max && !(min_inclusive && max_inclusive) {
            return Err(invalid(format!(
                "bounds {min} and {max} admit no value unless both ends are inclusive"
            )));
        }

        Ok(Self {
            min,
            max,
            min_inclusive,
            max_inclusive,
        })
    }

    pub fn inclusive(min: impl Into<Number>, max: impl Into<Number>) -> Result<Self, DefinitionError> {
        Self::new(min, max, true, true)
    }
}

impl Rule for InRange {
    fn code(&self) -> &str {
        "in_range"
    }

    fn evaluate(&self, candidate: &Value) -> Outcome {
        let value = try_outcome!(numeric(self.code(), candidate));

        let above_min = match try_outcome!(compare(value, self.min)) {
            Ordering::Greater => true,
            Ordering::Equal => self.min_inclusive,
            Ordering::Less => false,
        };
        if !above_min {
            let op = if self.min_inclusive { ">=" } else { ">" };
            return Outcome::fail(format!("Value {value} must be {op} {}", self.min));
        }

        let below_max = match try_outcome!(compare(value, self.max)) {
            Ordering::Less => true,
            Ordering::Equal => self.max_inclusive,
            Ordering::Greater => false,
        };
        if !below_max {
            let op = if self.max_inclusive { "<=" } else { "<" };
            return Outcome::fail(format!("Value {value} must be {op} {}", self.max));
        }

        Outcome::pass(candidate.clone())
    }

    fn operand(&self) -> Operand {
        Operand::Numeric
    }

    fn limits(&self) -> Limits {
        Limits {
            min_value: Some(self.min),
            min_exclusive: !self.min_inclusive,
            max_value: Some(self.max),
            max_exclusive: !self.max_inclusive,
            ..Limits::default()
        }
    }
}
