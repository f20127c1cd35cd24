//! Relative date conditions on `date_received`.
//!
//! Both the message date and `now` are UTC, so the comparison is between two
//! instants and never depends on whether the source timestamp carried an
//! offset.

use chrono::{DateTime, TimeDelta, Utc};

use crate::message::Message;

use super::condition::ConditionError;
use super::schema::{Condition, Predicate};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Evaluates a `date_received` condition against `now`.
///
/// `less_than N` holds when the message is newer than `now - N`;
/// `greater_than N` holds when it is older.
pub fn check_received(
    condition: &Condition,
    message: &Message,
    now: DateTime<Utc>,
) -> Result<bool, ConditionError> {
    let received = message.date_received.ok_or(ConditionError::MissingDate)?;
    let threshold = threshold(condition, now)?;

    match &condition.predicate {
        Predicate::LessThan => Ok(received > threshold),
        Predicate::GreaterThan => Ok(received < threshold),
        other => Err(ConditionError::UnknownPredicate {
            field: condition.field.to_string(),
            predicate: other.to_string(),
        }),
    }
}

/// Computes `now - value * unit`.
pub fn threshold(condition: &Condition, now: DateTime<Utc>) -> Result<DateTime<Utc>, ConditionError> {
    let days_per_unit = condition
        .unit
        .days()
        .ok_or_else(|| ConditionError::UnknownUnit(String::from(condition.unit.clone())))?;

    let value = condition
        .value_number()
        .ok_or_else(|| ConditionError::InvalidThreshold(condition.value_text()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ConditionError::InvalidThreshold(value.to_string()));
    }

    let millis = value * days_per_unit * MILLIS_PER_DAY;
    if millis > i64::MAX as f64 {
        return Err(ConditionError::InvalidThreshold(value.to_string()));
    }

    let span = TimeDelta::try_milliseconds(millis as i64)
        .ok_or_else(|| ConditionError::InvalidThreshold(value.to_string()))?;

    now.checked_sub_signed(span)
        .ok_or_else(|| ConditionError::InvalidThreshold(value.to_string()))
}
