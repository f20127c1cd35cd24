//! Action dispatch errors.

use thiserror::Error;

use crate::provider::ProviderError;

/// Why a single action was not applied.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("message has no external identifier")]
    MissingExternalId,

    #[error("unrecognized action type '{0}'")]
    Unrecognized(String),

    #[error("{action} failed: {source}")]
    Provider {
        action: String,
        #[source]
        source: ProviderError,
    },
}
