//! The message record evaluated by rules, and the timestamp boundary.
//!
//! Every timestamp entering the crate goes through [`parse_received`], which
//! normalizes it to UTC. Rule evaluation therefore never compares a
//! timezone-aware value against a naive one.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Naive layouts accepted after RFC 3339 and RFC 2822 have failed.
/// Values in these layouts carry no offset and are read as local time.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A stored email message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Provider-assigned identifier, required to apply actions.
    pub external_id: Option<String>,
    pub thread_id: Option<String>,
    pub sender: String,
    pub recipient: String,
    pub cc: Option<String>,
    pub subject: String,
    pub snippet: Option<String>,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    /// When the message was received, always UTC.
    pub date_received: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    /// Text and HTML bodies joined with a single space. Missing parts are empty.
    pub fn body(&self) -> String {
        format!(
            "{} {}",
            self.body_text.as_deref().unwrap_or(""),
            self.body_html.as_deref().unwrap_or("")
        )
    }

    /// Identifier used in log lines when the provider id is missing.
    pub fn display_id(&self) -> &str {
        self.external_id.as_deref().unwrap_or("unknown")
    }
}

/// Parses a received timestamp into UTC.
///
/// Returns `None` for empty or unparsable input; callers treat that the same
/// as a missing date.
pub fn parse_received(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return local_to_utc(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(local_to_utc)
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    // Ambiguous local times (DST fold) resolve to the earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
