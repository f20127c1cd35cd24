//! Gmail REST API payloads and their conversion into [`Message`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::labels::UNREAD;
use crate::message::{parse_received, Message};

/// Response of `GET users/me/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Request body of `POST users/me/messages/{id}/modify`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest<'a> {
    #[serde(skip_serializing_if = "is_empty")]
    pub add_label_ids: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    pub remove_label_ids: &'a [String],
}

/// A message as returned by `GET users/me/messages/{id}`.
///
/// With `format=minimal` only the id, thread and labels are present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    /// Milliseconds since the epoch, encoded as a string.
    #[serde(default)]
    pub internal_date: Option<String>,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartBody {
    /// base64url-encoded content.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

fn is_empty(labels: &&[String]) -> bool {
    labels.is_empty()
}

impl GmailMessage {
    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Received date from the `Date` header, falling back to `internalDate`.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.header("Date").and_then(parse_received).or_else(|| {
            self.internal_date
                .as_deref()
                .and_then(|ms| ms.parse::<i64>().ok())
                .and_then(DateTime::from_timestamp_millis)
        })
    }

    pub fn into_message(self) -> Message {
        let (body_text, body_html) = match &self.payload {
            Some(part) => (
                find_body(part, "text/plain"),
                find_body(part, "text/html"),
            ),
            None => (None, None),
        };

        Message {
            sender: self.header("From").unwrap_or_default().to_string(),
            recipient: self.header("To").unwrap_or_default().to_string(),
            cc: self.header("Cc").map(str::to_string),
            subject: self.header("Subject").unwrap_or_default().to_string(),
            date_received: self.received_at(),
            is_read: !self.label_ids.iter().any(|l| l == UNREAD),
            body_text,
            body_html,
            external_id: Some(self.id),
            thread_id: self.thread_id,
            snippet: self.snippet,
            labels: self.label_ids,
        }
    }
}

/// Depth-first search for the first part of the given MIME type.
fn find_body(part: &MessagePart, mime_type: &str) -> Option<String> {
    let is_match = part
        .mime_type
        .as_deref()
        .is_some_and(|m| m.eq_ignore_ascii_case(mime_type));

    if is_match {
        if let Some(text) = part
            .body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .and_then(decode_body)
        {
            return Some(text);
        }
    }

    part.parts.iter().find_map(|child| find_body(child, mime_type))
}

/// Decodes Gmail's base64url body data, with or without padding.
pub fn decode_body(data: &str) -> Option<String> {
    let trimmed = data.trim().trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> String {
        URL_SAFE_NO_PAD.encode(text)
    }

    fn full_message_json() -> serde_json::Value {
        serde_json::json!({
            "id": "18c2f",
            "threadId": "t-1",
            "labelIds": ["INBOX", "UNREAD"],
            "snippet": "Quarterly numbers",
            "internalDate": "1767225600000",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [
                    {"name": "From", "value": "Boss <boss@co.com>"},
                    {"name": "to", "value": "me@co.com"},
                    {"name": "Subject", "value": "Urgent: respond"},
                    {"name": "Date", "value": "Thu, 1 Jan 2026 10:00:00 +0100"}
                ],
                "parts": [
                    {"mimeType": "text/plain", "body": {"data": encode("plain body?"), "size": 11}},
                    {"mimeType": "text/html", "body": {"data": encode("<p>html body</p>"), "size": 16}}
                ]
            }
        })
    }

    #[test]
    fn test_into_message() {
        let gmail: GmailMessage = serde_json::from_value(full_message_json()).unwrap();
        let message = gmail.into_message();

        assert_eq!(message.external_id.as_deref(), Some("18c2f"));
        assert_eq!(message.thread_id.as_deref(), Some("t-1"));
        assert_eq!(message.sender, "Boss <boss@co.com>");
        assert_eq!(message.recipient, "me@co.com");
        assert_eq!(message.subject, "Urgent: respond");
        assert_eq!(message.body_text.as_deref(), Some("plain body?"));
        assert_eq!(message.body_html.as_deref(), Some("<p>html body</p>"));
        assert!(!message.is_read);
        assert_eq!(message.labels, vec!["INBOX", "UNREAD"]);
        assert_eq!(
            message.date_received.unwrap().to_rfc3339(),
            "2026-01-01T09:00:00+00:00"
        );
    }

    #[test]
    fn test_internal_date_fallback() {
        let mut json = full_message_json();
        json["payload"]["headers"] = serde_json::json!([]);
        let gmail: GmailMessage = serde_json::from_value(json).unwrap();
        assert_eq!(
            gmail.received_at().unwrap().to_rfc3339(),
            "2026-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_nested_parts() {
        let json = serde_json::json!({
            "id": "x",
            "labelIds": ["INBOX"],
            "payload": {
                "mimeType": "multipart/mixed",
                "parts": [
                    {
                        "mimeType": "multipart/alternative",
                        "parts": [
                            {"mimeType": "text/plain", "body": {"data": encode("deep")}}
                        ]
                    },
                    {"mimeType": "application/pdf", "body": {"size": 2048}}
                ]
            }
        });
        let message = serde_json::from_value::<GmailMessage>(json)
            .unwrap()
            .into_message();
        assert_eq!(message.body_text.as_deref(), Some("deep"));
        assert_eq!(message.body_html, None);
        assert!(message.is_read);
        assert_eq!(message.subject, "");
    }

    #[test]
    fn test_minimal_format() {
        let json = serde_json::json!({"id": "x", "labelIds": ["INBOX", "UNREAD"]});
        let gmail: GmailMessage = serde_json::from_value(json).unwrap();
        assert_eq!(gmail.label_ids, vec!["INBOX", "UNREAD"]);
        assert!(gmail.header("From").is_none());
    }

    #[test]
    fn test_decode_body_with_padding() {
        assert_eq!(decode_body("aGk=").as_deref(), Some("hi"));
        assert_eq!(decode_body("aGk").as_deref(), Some("hi"));
        assert_eq!(decode_body("!!!"), None);
    }

    #[test]
    fn test_modify_request_skips_empty_lists() {
        let add = vec!["TRASH".to_string()];
        let body = ModifyRequest {
            add_label_ids: &add,
            remove_label_ids: &[],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"addLabelIds": ["TRASH"]})
        );
    }
}
