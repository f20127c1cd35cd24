//! Pulls the newest inbox messages from the provider into the store.

use log::{info, warn};

use crate::db::{message_repo, Database};
use crate::error::Result;
use crate::provider::MessageFetcher;

/// Outcome of one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub listed: usize,
    pub stored: usize,
    pub failed: usize,
}

pub struct MessageSync<'a> {
    fetcher: &'a dyn MessageFetcher,
    db: &'a Database,
}

impl<'a> MessageSync<'a> {
    pub fn new(fetcher: &'a dyn MessageFetcher, db: &'a Database) -> Self {
        Self { fetcher, db }
    }

    /// Lists up to `max` inbox messages and stores each one.
    ///
    /// A listing failure aborts the sync. Failures on individual messages are
    /// logged and counted.
    pub async fn run(&self, max: u32) -> Result<SyncSummary> {
        let ids = self.fetcher.list_inbox(max).await?;
        let mut summary = SyncSummary {
            listed: ids.len(),
            ..Default::default()
        };

        for id in &ids {
            let stored = match self.fetcher.fetch_message(id).await {
                Ok(message) => message_repo::upsert(self.db, &message).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match stored {
                Ok(()) => summary.stored += 1,
                Err(reason) => {
                    warn!("Failed to sync message {}: {}", id, reason);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Synced {} of {} inbox messages ({} failed)",
            summary.stored, summary.listed, summary.failed
        );
        Ok(summary)
    }
}
