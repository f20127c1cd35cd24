//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use mailtriage::rules::{
    Action, Condition, ConditionField, DateUnit, Predicate, Rule, RulePredicate,
};
use mailtriage::Message;

/// Fixed evaluation instant used across tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

/// Builder for creating `Rule` instances.
pub struct RuleBuilder {
    description: Option<String>,
    predicate: RulePredicate,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
}

impl RuleBuilder {
    /// Create a rule that requires all conditions.
    pub fn all() -> Self {
        Self {
            description: None,
            predicate: RulePredicate::All,
            conditions: vec![],
            actions: vec![],
        }
    }

    /// Create a rule that requires any condition.
    pub fn any() -> Self {
        Self {
            predicate: RulePredicate::Any,
            ..Self::all()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn build(self) -> Rule {
        Rule {
            description: self.description,
            predicate: self.predicate,
            conditions: self.conditions,
            actions: self.actions,
        }
    }
}

/// Create a text condition.
pub fn text(field: ConditionField, predicate: Predicate, value: &str) -> Condition {
    Condition {
        field,
        predicate,
        value: Some(Value::String(value.to_string())),
        unit: DateUnit::Days,
    }
}

/// Create a `contains` condition.
pub fn contains(field: ConditionField, value: &str) -> Condition {
    text(field, Predicate::Contains, value)
}

/// Create a `date_received` condition.
pub fn received(predicate: Predicate, value: f64, unit: DateUnit) -> Condition {
    Condition {
        field: ConditionField::DateReceived,
        predicate,
        value: Some(Value::from(value)),
        unit,
    }
}

/// Create a `move` action.
pub fn move_to(mailbox: &str) -> Action {
    Action::Move {
        mailbox: mailbox.to_string(),
    }
}

/// Builder for creating `Message` instances.
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            message: Message {
                external_id: Some(id.to_string()),
                sender: "someone@example.com".to_string(),
                recipient: "me@example.com".to_string(),
                date_received: Some(fixed_now()),
                labels: vec!["INBOX".to_string(), "UNREAD".to_string()],
                ..Default::default()
            },
        }
    }

    pub fn without_id() -> Self {
        let mut builder = Self::new("");
        builder.message.external_id = None;
        builder
    }

    pub fn sender(mut self, sender: &str) -> Self {
        self.message.sender = sender.to_string();
        self
    }

    pub fn recipient(mut self, recipient: &str) -> Self {
        self.message.recipient = recipient.to_string();
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.message.subject = subject.to_string();
        self
    }

    pub fn body_text(mut self, body: &str) -> Self {
        self.message.body_text = Some(body.to_string());
        self
    }

    pub fn body_html(mut self, body: &str) -> Self {
        self.message.body_html = Some(body.to_string());
        self
    }

    /// Received `days` days before [`fixed_now`].
    pub fn days_old(mut self, days: i64) -> Self {
        self.message.date_received = Some(fixed_now() - Duration::days(days));
        self
    }

    pub fn undated(mut self) -> Self {
        self.message.date_received = None;
        self
    }

    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.message.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}
