//! OAuth session error types.

use thiserror::Error;

use crate::db::DatabaseError;

/// Errors while obtaining a usable access token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No token row exists for the account.
    #[error("No stored OAuth token for '{user_email}'. Run the consent flow to authorize this account first")]
    NoStoredToken { user_email: String },

    /// The stored token expired and cannot be refreshed.
    #[error("OAuth token for '{user_email}' expired and has no refresh token. Re-run the consent flow")]
    ReauthRequired { user_email: String },

    /// The token endpoint rejected or failed the refresh.
    #[error("OAuth2 token refresh failed: {0}")]
    Refresh(String),

    #[error("Token store error: {0}")]
    Database(#[from] DatabaseError),
}
