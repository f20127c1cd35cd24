//! Refresh-token grant against an OAuth2 token endpoint.

use log::info;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::AuthError;
use crate::sanitize;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token response from the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,

    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds of the access token.
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// A rotated refresh token, when the provider issues one.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Space-separated list of granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

/// HTTP client for the refresh-token grant.
#[derive(Debug, Clone)]
pub struct TokenClient {
    client: Client,
}

impl TokenClient {
    pub fn new() -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Refresh(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh(
        &self,
        token_uri: &str,
        refresh_token: &SecretString,
        client_id: &str,
        client_secret: Option<&SecretString>,
    ) -> Result<TokenResponse, AuthError> {
        info!("Refreshing access token");

        let mut params = vec![
            ("client_id", client_id),
            ("refresh_token", refresh_token.expose_secret()),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = client_secret {
            params.push(("client_secret", secret.expose_secret()));
        }

        let response = self
            .client
            .post(token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Refresh(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Refresh(format!(
                "Token endpoint returned {}: {}",
                status,
                sanitize::error_body(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Refresh(format!("Failed to parse refresh response: {}", e)))?;

        info!("Successfully refreshed access token");
        Ok(token)
    }
}
