//! Condition matching against a single message field.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use thiserror::Error;

use crate::message::Message;

use super::date;
use super::schema::{Condition, ConditionField, Predicate};

/// Why a condition could not be evaluated.
///
/// [`Condition::evaluate`] maps every variant to `false`; callers that need to
/// tell "did not match" apart from "could not be evaluated" use
/// [`Condition::check`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown predicate '{predicate}' for field '{field}'")]
    UnknownPredicate { field: String, predicate: String },

    #[error("unknown date unit '{0}'")]
    UnknownUnit(String),

    #[error("message has no usable received date")]
    MissingDate,

    #[error("invalid date threshold: {0}")]
    InvalidThreshold(String),
}

impl Condition {
    /// Tests the condition, reporting why evaluation was impossible.
    pub fn check(&self, message: &Message, now: DateTime<Utc>) -> Result<bool, ConditionError> {
        let haystack = match &self.field {
            ConditionField::From => message.sender.to_lowercase(),
            ConditionField::To => message.recipient.to_lowercase(),
            ConditionField::Subject => message.subject.to_lowercase(),
            ConditionField::Body => message.body().to_lowercase(),
            ConditionField::DateReceived => return date::check_received(self, message, now),
            ConditionField::Unrecognized(name) => {
                return Err(ConditionError::UnknownField(name.clone()))
            }
        };
        let needle = self.value_text().to_lowercase();

        match &self.predicate {
            Predicate::Contains => Ok(haystack.contains(&needle)),
            Predicate::DoesNotContain => Ok(!haystack.contains(&needle)),
            Predicate::Equals => Ok(haystack == needle),
            Predicate::DoesNotEqual => Ok(haystack != needle),
            other => Err(ConditionError::UnknownPredicate {
                field: self.field.to_string(),
                predicate: other.to_string(),
            }),
        }
    }

    /// Tests the condition; anything that cannot be evaluated is "no match".
    pub fn evaluate(&self, message: &Message, now: DateTime<Utc>) -> bool {
        match self.check(message, now) {
            Ok(matched) => matched,
            Err(ConditionError::MissingDate) => {
                debug!(
                    "Message {} has no received date, condition does not match",
                    message.display_id()
                );
                false
            }
            Err(e) => {
                warn!("Skipping condition: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(field: &str, predicate: &str, value: &str) -> Condition {
        Condition {
            field: ConditionField::from(field.to_string()),
            predicate: Predicate::from(predicate.to_string()),
            value: Some(serde_json::Value::String(value.to_string())),
            ..Default::default()
        }
    }

    fn test_message() -> Message {
        Message {
            external_id: Some("msg-1".to_string()),
            sender: "Boss <Boss@Co.com>".to_string(),
            recipient: "me@co.com".to_string(),
            subject: "Urgent: respond".to_string(),
            body_text: Some("Quarterly numbers attached".to_string()),
            body_html: Some("<p>Quarterly <b>numbers</b></p>".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_contains_ignores_case() {
        let now = Utc::now();
        assert!(condition("from", "contains", "BOSS@co").evaluate(&test_message(), now));
    }

    #[test]
    fn test_subject_equals() {
        let now = Utc::now();
        let msg = test_message();
        assert!(condition("subject", "equals", "urgent: RESPOND").evaluate(&msg, now));
        assert!(!condition("subject", "equals", "urgent").evaluate(&msg, now));
        assert!(condition("subject", "does_not_equal", "urgent").evaluate(&msg, now));
    }

    #[test]
    fn test_to_field() {
        let now = Utc::now();
        assert!(condition("to", "contains", "me@").evaluate(&test_message(), now));
    }

    #[test]
    fn test_body_searches_text_and_html() {
        let now = Utc::now();
        let msg = test_message();
        assert!(condition("message", "contains", "attached").evaluate(&msg, now));
        assert!(condition("body", "contains", "<b>numbers</b>").evaluate(&msg, now));
        assert!(condition("body", "does_not_contain", "invoice").evaluate(&msg, now));
    }

    #[test]
    fn test_body_with_missing_parts() {
        let now = Utc::now();
        let msg = Message {
            body_text: None,
            body_html: Some("only html".to_string()),
            ..Default::default()
        };
        assert!(condition("body", "contains", "only html").evaluate(&msg, now));
        assert!(condition("body", "equals", " only html").evaluate(&msg, now));
    }

    #[test]
    fn test_unknown_field_is_fail_closed() {
        let now = Utc::now();
        let cond = condition("cc", "contains", "");
        assert_eq!(
            cond.check(&test_message(), now),
            Err(ConditionError::UnknownField("cc".to_string()))
        );
        assert!(!cond.evaluate(&test_message(), now));
    }

    #[test]
    fn test_unknown_predicate_is_fail_closed() {
        let now = Utc::now();
        let cond = condition("subject", "starts_with", "urgent");
        assert!(matches!(
            cond.check(&test_message(), now),
            Err(ConditionError::UnknownPredicate { .. })
        ));
        assert!(!cond.evaluate(&test_message(), now));
    }

    #[test]
    fn test_date_predicate_on_text_field_is_fail_closed() {
        let now = Utc::now();
        assert!(!condition("subject", "less_than", "3").evaluate(&test_message(), now));
    }

    #[test]
    fn test_empty_field_and_empty_value() {
        let now = Utc::now();
        let msg = Message::default();
        // "" contains "" holds, so its negation must not.
        assert!(condition("subject", "contains", "").evaluate(&msg, now));
        assert!(!condition("subject", "does_not_contain", "").evaluate(&msg, now));
    }

    #[test]
    fn test_non_string_value_compares_as_text() {
        let now = Utc::now();
        let msg = Message {
            subject: "Order 42 shipped".to_string(),
            ..Default::default()
        };
        let cond = Condition {
            field: ConditionField::Subject,
            predicate: Predicate::Contains,
            value: Some(serde_json::json!(42)),
            ..Default::default()
        };
        assert!(cond.evaluate(&msg, now));
    }
}
