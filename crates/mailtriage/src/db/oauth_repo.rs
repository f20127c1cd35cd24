//! Stored OAuth tokens in the `oauth_tokens` table, one row per account.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;

use super::{Database, DatabaseError};

/// A stored OAuth token row, keyed by the account email.
#[derive(Clone)]
pub struct OAuthTokenRow {
    pub user_email: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    /// Space-separated granted scopes.
    pub scopes: String,
    /// RFC 3339 expiry; `None` when the provider did not report one.
    pub expiry: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl std::fmt::Debug for OAuthTokenRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokenRow")
            .field("user_email", &self.user_email)
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("expiry", &self.expiry)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl OAuthTokenRow {
    /// Parsed expiry, if present and well-formed.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry
            .as_deref()
            .and_then(|e| DateTime::parse_from_rfc3339(e).ok())
            .map(|e| e.with_timezone(&Utc))
    }

    /// Checks if the token is expired (or expires within `buffer_seconds`).
    ///
    /// A row without an expiry is current as long as it holds an access token.
    /// An unparseable expiry counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>, buffer_seconds: u64) -> bool {
        if self.expiry.is_none() {
            return self.access_token.is_empty();
        }
        let Some(expires) = self.expires_at() else {
            return true;
        };
        let buffer = chrono::Duration::seconds(buffer_seconds.min(365 * 24 * 3600) as i64);
        expires <= now + buffer
    }

    /// Checks if the token can be refreshed.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Formats a timestamp the way token rows store it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Inserts or updates an OAuth token.
pub fn upsert(db: &Database, row: &OAuthTokenRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO oauth_tokens (user_email, access_token, refresh_token, token_uri, client_id,
                                       client_secret, scopes, expiry, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(user_email) DO UPDATE SET
               access_token = ?2,
               refresh_token = ?3,
               token_uri = ?4,
               client_id = ?5,
               client_secret = ?6,
               scopes = ?7,
               expiry = ?8,
               updated_at = ?10",
            params![
                row.user_email,
                row.access_token,
                row.refresh_token,
                row.token_uri,
                row.client_id,
                row.client_secret,
                row.scopes,
                row.expiry,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Stores a refreshed access token.
///
/// The refresh token is only replaced when `refresh_token` is `Some`.
/// Returns `false` when no row exists for the account.
pub fn update_access_token(
    db: &Database,
    user_email: &str,
    access_token: &str,
    expiry: Option<&str>,
    refresh_token: Option<&str>,
) -> Result<bool, DatabaseError> {
    let updated_at = format_timestamp(Utc::now());
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE oauth_tokens SET
               access_token = ?2,
               expiry = ?3,
               refresh_token = COALESCE(?4, refresh_token),
               updated_at = ?5
             WHERE user_email = ?1",
            params![user_email, access_token, expiry, refresh_token, updated_at],
        )?;
        Ok(changed > 0)
    })
}

/// Finds a token by account email.
pub fn find(db: &Database, user_email: &str) -> Result<Option<OAuthTokenRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT user_email, access_token, refresh_token, token_uri, client_id, client_secret,
                    scopes, expiry, created_at, updated_at
             FROM oauth_tokens WHERE user_email = ?1",
        )?;
        let mut rows = stmt.query_map(params![user_email], |row| {
            Ok(OAuthTokenRow {
                user_email: row.get(0)?,
                access_token: row.get(1)?,
                refresh_token: row.get(2)?,
                token_uri: row.get(3)?,
                client_id: row.get(4)?,
                client_secret: row.get(5)?,
                scopes: row.get(6)?,
                expiry: row.get(7)?,
                created_at: row.get(8)?,
                updated_at: row.get(9)?,
            })
        })?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}
