use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Authentication error: {0}")]
    Auth(#[from] crate::auth::AuthError),

    #[error("Provider error: {0}")]
    Provider(#[from] crate::provider::ProviderError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read rules file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Required environment variable '{name}' is not set")]
    MissingEnv { name: String },

    #[error("Invalid value for '{name}': {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("Failed to load env file '{path}': {reason}")]
    EnvFile { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, TriageError>;
