//! In-memory `MessageSource` for runner tests.

use mailtriage::db::DatabaseError;
use mailtriage::{Message, MessageSource};

/// Messages handed to the runner in the order given, truncated to the limit.
pub struct StoredMessages(pub Vec<Message>);

impl MessageSource for StoredMessages {
    fn fetch_recent(&self, limit: usize) -> Result<Vec<Message>, DatabaseError> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }
}
