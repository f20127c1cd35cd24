//! Where the runner reads messages from.

use crate::db::{message_repo, Database, DatabaseError};
use crate::message::Message;

/// Supplies the most recent stored messages.
pub trait MessageSource {
    /// Up to `limit` messages, newest first.
    fn fetch_recent(&self, limit: usize) -> Result<Vec<Message>, DatabaseError>;
}

impl MessageSource for Database {
    fn fetch_recent(&self, limit: usize) -> Result<Vec<Message>, DatabaseError> {
        message_repo::fetch_recent(self, limit)
    }
}
