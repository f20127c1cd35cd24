//! Access-token session over the stored token row.
//!
//! A run asks the [`SessionManager`] for an access token once. The stored row
//! decides what happens next:
//!
//! | state            | condition                                  | result            |
//! |------------------|--------------------------------------------|-------------------|
//! | no row           |                                            | `NoStoredToken`   |
//! | `Valid`          | no expiry, or expiry more than 60 s away   | stored token      |
//! | `Refreshable`    | expired or unparseable, refresh token      | refreshed token   |
//! | `ReauthRequired` | expired or unparseable, no refresh token   | `ReauthRequired`  |

use chrono::{DateTime, Utc};
use log::{debug, info};
use secrecy::SecretString;

use super::error::AuthError;
use super::token_client::TokenClient;
use crate::db::oauth_repo::{self, OAuthTokenRow};
use crate::db::Database;

/// Seconds before expiry at which a token is treated as expired.
pub const EXPIRY_BUFFER_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    Refreshable,
    ReauthRequired,
}

/// Classifies a stored token at `now`.
pub fn classify(row: &OAuthTokenRow, now: DateTime<Utc>) -> TokenState {
    if !row.is_expired(now, EXPIRY_BUFFER_SECS) {
        TokenState::Valid
    } else if row.can_refresh() {
        TokenState::Refreshable
    } else {
        TokenState::ReauthRequired
    }
}

/// Hands out access tokens for one account, refreshing through the token
/// endpoint when the stored one is stale.
pub struct SessionManager<'a> {
    db: &'a Database,
    user_email: String,
    fallback_client_secret: Option<SecretString>,
    token_client: TokenClient,
}

impl<'a> SessionManager<'a> {
    pub fn new(
        db: &'a Database,
        user_email: impl Into<String>,
        fallback_client_secret: Option<SecretString>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            db,
            user_email: user_email.into(),
            fallback_client_secret,
            token_client: TokenClient::new()?,
        })
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub async fn access_token(&self) -> Result<SecretString, AuthError> {
        self.access_token_at(Utc::now()).await
    }

    /// Same as [`access_token`](Self::access_token) with an explicit clock.
    pub async fn access_token_at(&self, now: DateTime<Utc>) -> Result<SecretString, AuthError> {
        let row = oauth_repo::find(self.db, &self.user_email)?.ok_or_else(|| {
            AuthError::NoStoredToken {
                user_email: self.user_email.clone(),
            }
        })?;

        match classify(&row, now) {
            TokenState::Valid => {
                debug!("Using stored access token for {}", self.user_email);
                Ok(SecretString::from(row.access_token))
            }
            TokenState::Refreshable => self.refresh(row, now).await,
            TokenState::ReauthRequired => Err(AuthError::ReauthRequired {
                user_email: self.user_email.clone(),
            }),
        }
    }

    async fn refresh(&self, row: OAuthTokenRow, now: DateTime<Utc>) -> Result<SecretString, AuthError> {
        let refresh_token = SecretString::from(row.refresh_token.unwrap_or_default());
        let stored_secret = row
            .client_secret
            .filter(|s| !s.is_empty())
            .map(SecretString::from);
        let client_secret = stored_secret
            .as_ref()
            .or(self.fallback_client_secret.as_ref());

        let response = self
            .token_client
            .refresh(
                &row.token_uri,
                &refresh_token,
                &row.client_id,
                client_secret,
            )
            .await?;

        let expiry = response
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .map(oauth_repo::format_timestamp);

        oauth_repo::update_access_token(
            self.db,
            &self.user_email,
            &response.access_token,
            expiry.as_deref(),
            response.refresh_token.as_deref().filter(|t| !t.is_empty()),
        )?;

        info!(
            "Stored refreshed access token for {} (expires {})",
            self.user_email,
            expiry.as_deref().unwrap_or("unknown")
        );
        Ok(SecretString::from(response.access_token))
    }
}
