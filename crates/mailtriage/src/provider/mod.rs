//! Mail provider collaborators.
//!
//! The engine talks to the provider through two narrow traits:
//! [`ActionProvider`] for the mutations a matched rule requests, and
//! [`MessageFetcher`] for pulling inbox messages into the store.
//! [`GmailClient`] implements both over the Gmail REST API.

pub mod error;
pub mod gmail;
pub mod gmail_types;

use async_trait::async_trait;

use crate::message::Message;

pub use error::ProviderError;
pub use gmail::GmailClient;

/// Provider-side mutations used by the action dispatcher.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Adds (`true`) or removes (`false`) the unread marker.
    async fn set_unread(&self, id: &str, unread: bool) -> error::Result<()>;

    /// Current label/folder set of a message.
    async fn get_labels(&self, id: &str) -> error::Result<Vec<String>>;

    /// Applies one label update.
    async fn set_labels(&self, id: &str, add: &[String], remove: &[String]) -> error::Result<()>;
}

/// Read access used by inbox sync.
#[async_trait]
pub trait MessageFetcher: Send + Sync {
    /// Ids of the newest inbox messages, newest first.
    async fn list_inbox(&self, max_results: u32) -> error::Result<Vec<String>>;

    /// Full message, converted to the stored model.
    async fn fetch_message(&self, id: &str) -> error::Result<Message>;
}
