//! Serialized form of the rule file.
//!
//! Names in the rule file are matched case-insensitively. Every name-bearing
//! enum has an `Unrecognized` variant holding the original text so that a rule
//! file written for a newer version still loads; unrecognized values evaluate
//! to "no match" or "no action".

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Top-level document: `{ "rules": [ ... ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub predicate: RulePredicate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actions: Vec<Action>,
}

/// Reads an explicit `null` list as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Rule {
    /// Display name: the description, or `Rule N` for the 1-based position.
    pub fn name(&self, index: usize) -> String {
        match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc.to_string(),
            _ => format!("Rule {}", index + 1),
        }
    }
}

/// How a rule combines its condition results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RulePredicate {
    #[default]
    All,
    Any,
    Unrecognized(String),
}

impl From<String> for RulePredicate {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "all" => Self::All,
            "any" => Self::Any,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<RulePredicate> for String {
    fn from(p: RulePredicate) -> Self {
        match p {
            RulePredicate::All => "all".to_string(),
            RulePredicate::Any => "any".to_string(),
            RulePredicate::Unrecognized(s) => s,
        }
    }
}

/// A single test against one message field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub field: ConditionField,
    #[serde(default)]
    pub predicate: Predicate,
    /// String for text fields, number of units for `date_received`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub unit: DateUnit,
}

impl Condition {
    /// Comparison text: strings as-is, other JSON scalars by their textual
    /// form, absent or null as empty.
    pub fn value_text(&self) -> String {
        match &self.value {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Numeric value for date conditions. Absent or null counts as zero;
    /// numeric strings are accepted.
    pub fn value_number(&self) -> Option<f64> {
        match &self.value {
            None | Some(serde_json::Value::Null) => Some(0.0),
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionField {
    From,
    To,
    Subject,
    /// `message` or `body`: text and HTML bodies joined.
    Body,
    DateReceived,
    Unrecognized(String),
}

impl Default for ConditionField {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for ConditionField {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "from" => Self::From,
            "to" => Self::To,
            "subject" => Self::Subject,
            "message" | "body" => Self::Body,
            "date_received" => Self::DateReceived,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<ConditionField> for String {
    fn from(f: ConditionField) -> Self {
        f.to_string()
    }
}

impl fmt::Display for ConditionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => f.write_str("from"),
            Self::To => f.write_str("to"),
            Self::Subject => f.write_str("subject"),
            Self::Body => f.write_str("message"),
            Self::DateReceived => f.write_str("date_received"),
            Self::Unrecognized(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Predicate {
    Contains,
    DoesNotContain,
    Equals,
    DoesNotEqual,
    LessThan,
    GreaterThan,
    Unrecognized(String),
}

impl Default for Predicate {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for Predicate {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "contains" => Self::Contains,
            "does_not_contain" | "not_contains" => Self::DoesNotContain,
            "equals" => Self::Equals,
            "does_not_equal" | "not_equals" => Self::DoesNotEqual,
            "less_than" => Self::LessThan,
            "greater_than" => Self::GreaterThan,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<Predicate> for String {
    fn from(p: Predicate) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => f.write_str("contains"),
            Self::DoesNotContain => f.write_str("does_not_contain"),
            Self::Equals => f.write_str("equals"),
            Self::DoesNotEqual => f.write_str("does_not_equal"),
            Self::LessThan => f.write_str("less_than"),
            Self::GreaterThan => f.write_str("greater_than"),
            Self::Unrecognized(s) => f.write_str(s),
        }
    }
}

/// Unit for `date_received` values. Months are approximated as 30 days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateUnit {
    #[default]
    Days,
    Months,
    Unrecognized(String),
}

impl DateUnit {
    /// Days per unit, `None` when unrecognized.
    pub fn days(&self) -> Option<f64> {
        match self {
            Self::Days => Some(1.0),
            Self::Months => Some(30.0),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for DateUnit {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "days" => Self::Days,
            "months" => Self::Months,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<DateUnit> for String {
    fn from(u: DateUnit) -> Self {
        match u {
            DateUnit::Days => "days".to_string(),
            DateUnit::Months => "months".to_string(),
            DateUnit::Unrecognized(s) => s,
        }
    }
}

/// Mutation requested from the provider when a rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAction", into = "RawAction")]
pub enum Action {
    MarkRead,
    MarkUnread,
    Move { mailbox: String },
    Unrecognized(String),
}

/// Default target for a `move` action without a mailbox.
pub const DEFAULT_MAILBOX: &str = "INBOX";

/// Wire shape of an action: `{"type": "...", "mailbox": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAction {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mailbox: Option<String>,
}

impl From<RawAction> for Action {
    fn from(raw: RawAction) -> Self {
        match raw.kind.trim().to_lowercase().as_str() {
            "mark_read" | "mark_as_read" => Self::MarkRead,
            "mark_unread" | "mark_as_unread" => Self::MarkUnread,
            "move" => Self::Move {
                mailbox: raw
                    .mailbox
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MAILBOX.to_string()),
            },
            _ => Self::Unrecognized(raw.kind),
        }
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        match action {
            Action::MarkRead => RawAction {
                kind: "mark_read".to_string(),
                mailbox: None,
            },
            Action::MarkUnread => RawAction {
                kind: "mark_unread".to_string(),
                mailbox: None,
            },
            Action::Move { mailbox } => RawAction {
                kind: "move".to_string(),
                mailbox: Some(mailbox),
            },
            Action::Unrecognized(kind) => RawAction {
                kind,
                mailbox: None,
            },
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkRead => f.write_str("mark_read"),
            Self::MarkUnread => f.write_str("mark_unread"),
            Self::Move { mailbox } => write!(f, "move({})", mailbox),
            Self::Unrecognized(kind) => write!(f, "unrecognized({})", kind),
        }
    }
}
