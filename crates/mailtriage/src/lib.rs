pub mod actions;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod message;
pub mod provider;
pub mod rules;
pub mod runner;
pub mod sanitize;
pub mod secrets;
pub mod source;
pub mod sync;

pub use actions::{ActionDispatcher, ActionError, Applied, LabelChange};
pub use auth::{AuthError, SessionManager};
pub use config::Settings;
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, Result, TriageError};
pub use message::Message;
pub use provider::{ActionProvider, GmailClient, MessageFetcher, ProviderError};
pub use rules::{load_rules, load_rules_or_empty, Action, Rule, RuleEngine, RuleSet};
pub use runner::{BatchRunner, RunSummary};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use source::MessageSource;
pub use sync::{MessageSync, SyncSummary};
