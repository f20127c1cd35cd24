//! Gmail REST API client.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use super::error::{ProviderError, Result};
use super::gmail_types::{GmailMessage, ListMessagesResponse, ModifyRequest};
use super::{ActionProvider, MessageFetcher};
use crate::actions::LabelChange;
use crate::message::Message;
use crate::sanitize;

/// Base URL of the authenticated user's Gmail resources.
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Default connection timeout for HTTP requests.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for HTTP requests.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates an HTTP client with the provider timeouts applied.
pub(crate) fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::ClientSetup(e.to_string()))
}

/// Authenticated client for one Gmail mailbox.
pub struct GmailClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl std::fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl GmailClient {
    pub fn new(access_token: SecretString) -> Result<Self> {
        Self::with_base_url(access_token, DEFAULT_API_BASE)
    }

    /// Creates a client against a custom API base (used for testing).
    pub fn with_base_url(access_token: SecretString, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn message_url(&self, id: &str) -> String {
        format!("{}/messages/{}", self.base_url, id)
    }

    /// Adds and removes labels on a message in one call.
    pub async fn modify(&self, id: &str, add: &[String], remove: &[String]) -> Result<()> {
        debug!("Modifying labels on {}: +{:?} -{:?}", id, add, remove);

        let body = ModifyRequest {
            add_label_ids: add,
            remove_label_ids: remove,
        };
        let response = self
            .client
            .post(format!("{}/modify", self.message_url(id)))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Lists the ids of the newest messages carrying the INBOX label.
    pub async fn list_message_ids(&self, max_results: u32) -> Result<Vec<String>> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(format!("{}/messages", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
            .query(&[("labelIds", "INBOX"), ("maxResults", max_results.as_str())])
            .send()
            .await?;

        let list: ListMessagesResponse = check_status(response).await?.json().await?;
        debug!("Listed {} inbox messages", list.messages.len());
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    /// Fetches a message in the given format (`minimal` or `full`).
    pub async fn get_message(&self, id: &str, format: &str) -> Result<GmailMessage> {
        let response = self
            .client
            .get(self.message_url(id))
            .bearer_auth(self.access_token.expose_secret())
            .query(&[("format", format)])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}

/// Turns a non-success response into [`ProviderError::Status`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body: sanitize::error_body(&body),
    })
}

#[async_trait]
impl ActionProvider for GmailClient {
    async fn set_unread(&self, id: &str, unread: bool) -> Result<()> {
        let change = if unread {
            LabelChange::mark_unread()
        } else {
            LabelChange::mark_read()
        };
        self.modify(id, &change.add, &change.remove).await
    }

    async fn get_labels(&self, id: &str) -> Result<Vec<String>> {
        Ok(self.get_message(id, "minimal").await?.label_ids)
    }

    async fn set_labels(&self, id: &str, add: &[String], remove: &[String]) -> Result<()> {
        self.modify(id, add, remove).await
    }
}

#[async_trait]
impl MessageFetcher for GmailClient {
    async fn list_inbox(&self, max_results: u32) -> Result<Vec<String>> {
        self.list_message_ids(max_results).await
    }

    async fn fetch_message(&self, id: &str) -> Result<Message> {
        Ok(self.get_message(id, "full").await?.into_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> GmailClient {
        GmailClient::with_base_url(SecretString::from("test-token"), server.url()).unwrap()
    }

    #[tokio::test]
    async fn test_set_unread_false_removes_unread_label() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages/m1/modify")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(serde_json::json!({"removeLabelIds": ["UNREAD"]})))
            .with_status(200)
            .with_body(r#"{"id":"m1","labelIds":["INBOX"]}"#)
            .create_async()
            .await;

        client(&server).set_unread("m1", false).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_unread_true_adds_unread_label() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages/m1/modify")
            .match_body(Matcher::Json(serde_json::json!({"addLabelIds": ["UNREAD"]})))
            .with_status(200)
            .with_body(r#"{"id":"m1","labelIds":["INBOX","UNREAD"]}"#)
            .create_async()
            .await;

        client(&server).set_unread("m1", true).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_labels_sends_both_lists() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages/m2/modify")
            .match_body(Matcher::Json(serde_json::json!({
                "addLabelIds": ["TRASH"],
                "removeLabelIds": ["INBOX", "SPAM"]
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client(&server)
            .set_labels(
                "m2",
                &["TRASH".to_string()],
                &["INBOX".to_string(), "SPAM".to_string()],
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_labels_uses_minimal_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/messages/m3")
            .match_query(Matcher::UrlEncoded("format".into(), "minimal".into()))
            .with_status(200)
            .with_body(r#"{"id":"m3","labelIds":["INBOX","UNREAD"]}"#)
            .create_async()
            .await;

        let labels = client(&server).get_labels("m3").await.unwrap();
        assert_eq!(labels, vec!["INBOX", "UNREAD"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_inbox() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/messages")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("labelIds".into(), "INBOX".into()),
                Matcher::UrlEncoded("maxResults".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"messages":[{"id":"a","threadId":"t"},{"id":"b","threadId":"t"}]}"#)
            .create_async()
            .await;

        let ids = client(&server).list_inbox(2).await.unwrap();
        assert_eq!(ids, vec!["a", "b"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_inbox_empty_mailbox() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/messages")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"resultSizeEstimate":0}"#)
            .create_async()
            .await;

        assert!(client(&server).list_inbox(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/messages/gone/modify")
            .with_status(404)
            .with_body("Requested entity was not found.")
            .create_async()
            .await;

        let err = client(&server).set_unread("gone", true).await.unwrap_err();
        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Requested entity was not found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/messages/m4")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server).fetch_message("m4").await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GmailClient::new(SecretString::from("very-secret")).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("very-secret"));
        assert_eq!(client.base_url(), DEFAULT_API_BASE);
    }
}
