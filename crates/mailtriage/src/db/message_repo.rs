//! Message repository: the `emails` table.

use chrono::{SecondsFormat, Utc};
use log::warn;
use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::message::{parse_received, Message};

const SELECT_COLUMNS: &str = "gmail_message_id, thread_id, subject, sender, recipient, cc, snippet,
     body_text, body_html, labels, is_read, date_received";

/// Raw column values, decoded into a [`Message`] outside the row callback.
struct EmailRow {
    gmail_message_id: String,
    thread_id: Option<String>,
    subject: String,
    sender: String,
    recipient: String,
    cc: Option<String>,
    snippet: Option<String>,
    body_text: Option<String>,
    body_html: Option<String>,
    labels: String,
    is_read: bool,
    date_received: Option<String>,
}

impl EmailRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            gmail_message_id: row.get(0)?,
            thread_id: row.get(1)?,
            subject: row.get(2)?,
            sender: row.get(3)?,
            recipient: row.get(4)?,
            cc: row.get(5)?,
            snippet: row.get(6)?,
            body_text: row.get(7)?,
            body_html: row.get(8)?,
            labels: row.get(9)?,
            is_read: row.get(10)?,
            date_received: row.get(11)?,
        })
    }

    fn into_message(self) -> Result<Message, DatabaseError> {
        let labels: Vec<String> =
            serde_json::from_str(&self.labels).map_err(|e| DatabaseError::Corrupt {
                column: "labels",
                reason: e.to_string(),
            })?;

        Ok(Message {
            external_id: Some(self.gmail_message_id),
            thread_id: self.thread_id,
            sender: self.sender,
            recipient: self.recipient,
            cc: self.cc,
            subject: self.subject,
            snippet: self.snippet,
            body_text: self.body_text,
            body_html: self.body_html,
            date_received: self.date_received.as_deref().and_then(parse_received),
            labels,
            is_read: self.is_read,
        })
    }
}

/// Inserts a message or refreshes the stored copy with the same provider id.
pub fn upsert(db: &Database, message: &Message) -> Result<(), DatabaseError> {
    let id = message
        .external_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(DatabaseError::MissingMessageId)?;

    let labels = serde_json::to_string(&message.labels).map_err(|e| DatabaseError::Corrupt {
        column: "labels",
        reason: e.to_string(),
    })?;
    let date_received = message
        .date_received
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true));
    let fetched_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO emails (gmail_message_id, thread_id, subject, sender, recipient, cc, snippet,
                                 body_text, body_html, labels, is_read, date_received, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(gmail_message_id) DO UPDATE SET
               thread_id = ?2,
               subject = ?3,
               sender = ?4,
               recipient = ?5,
               cc = ?6,
               snippet = ?7,
               body_text = ?8,
               body_html = ?9,
               labels = ?10,
               is_read = ?11,
               date_received = ?12,
               fetched_at = ?13",
            params![
                id,
                message.thread_id,
                message.subject,
                message.sender,
                message.recipient,
                message.cc,
                message.snippet,
                message.body_text,
                message.body_html,
                labels,
                message.is_read,
                date_received,
                fetched_at,
            ],
        )?;
        Ok(())
    })
}

/// Returns up to `limit` messages, newest received first. Messages without a
/// received date come last.
///
/// A row whose stored columns cannot be decoded is logged and skipped.
pub fn fetch_recent(db: &Database, limit: usize) -> Result<Vec<Message>, DatabaseError> {
    let rows = db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM emails ORDER BY date_received DESC, id DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![limit as i64], EmailRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;

    let messages = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.gmail_message_id.clone();
            match row.into_message() {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("Skipping stored message {}: {}", id, e);
                    None
                }
            }
        })
        .collect();
    Ok(messages)
}

/// Finds a stored message by provider id.
pub fn find(db: &Database, gmail_message_id: &str) -> Result<Option<Message>, DatabaseError> {
    let row = db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM emails WHERE gmail_message_id = ?1",
            SELECT_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![gmail_message_id], EmailRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })?;

    row.map(EmailRow::into_message).transpose()
}

/// Counts stored messages.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM emails", [], |r| r.get(0))?;
        Ok(count)
    })
}
