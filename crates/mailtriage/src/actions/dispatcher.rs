//! Maps rule actions onto provider calls.

use log::debug;

use super::error::ActionError;
use super::labels::LabelChange;
use crate::message::Message;
use crate::provider::{ActionProvider, ProviderError};
use crate::rules::Action;

/// What a successfully dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    MarkedRead,
    MarkedUnread,
    Moved { mailbox: String, change: LabelChange },
}

/// Applies actions to messages through an [`ActionProvider`].
pub struct ActionDispatcher<'a> {
    provider: &'a dyn ActionProvider,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(provider: &'a dyn ActionProvider) -> Self {
        Self { provider }
    }

    /// Applies one action to one message.
    ///
    /// Each call is independent: a failure here says nothing about the next
    /// action on the same message.
    pub async fn dispatch(&self, action: &Action, message: &Message) -> Result<Applied, ActionError> {
        let id = message
            .external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ActionError::MissingExternalId)?;

        let wrap = |source: ProviderError| ActionError::Provider {
            action: action.to_string(),
            source,
        };

        match action {
            Action::MarkRead => {
                self.provider.set_unread(id, false).await.map_err(wrap)?;
                Ok(Applied::MarkedRead)
            }
            Action::MarkUnread => {
                self.provider.set_unread(id, true).await.map_err(wrap)?;
                Ok(Applied::MarkedUnread)
            }
            Action::Move { mailbox } => {
                let current = self.provider.get_labels(id).await.map_err(wrap)?;
                let change = LabelChange::move_to(mailbox, &current);
                debug!(
                    "Moving {} to {}: +{:?} -{:?}",
                    id, mailbox, change.add, change.remove
                );
                self.provider
                    .set_labels(id, &change.add, &change.remove)
                    .await
                    .map_err(wrap)?;
                Ok(Applied::Moved {
                    mailbox: mailbox.clone(),
                    change,
                })
            }
            Action::Unrecognized(kind) => Err(ActionError::Unrecognized(kind.clone())),
        }
    }
}
