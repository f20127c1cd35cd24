//! Runtime settings read from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::db::default_database_path;
use crate::error::{ConfigError, Result};
use crate::provider::gmail::DEFAULT_API_BASE;
use crate::secrets::{expand_home, resolve_secret_optional};

pub const USER_EMAIL_ENV: &str = "MAILTRIAGE_USER_EMAIL";
pub const RULES_ENV: &str = "MAILTRIAGE_RULES";
pub const DB_ENV: &str = "MAILTRIAGE_DB";
pub const LIMIT_ENV: &str = "MAILTRIAGE_LIMIT";
pub const FETCH_ENV: &str = "MAILTRIAGE_FETCH";
pub const API_BASE_ENV: &str = "MAILTRIAGE_API_BASE";
pub const CLIENT_SECRET_ENV: &str = "MAILTRIAGE_CLIENT_SECRET";
pub const CLIENT_SECRET_FILE_ENV: &str = "MAILTRIAGE_CLIENT_SECRET_FILE";

/// Env file read from the working directory at startup.
pub const DOTENV_FILE: &str = ".env";

pub const DEFAULT_RULES_PATH: &str = "rules.json";
pub const DEFAULT_LIMIT: usize = 100;

/// Settings for one triage run.
#[derive(Debug)]
pub struct Settings {
    /// Account whose stored OAuth token is used.
    pub user_email: String,
    pub rules_path: PathBuf,
    pub database_path: PathBuf,
    /// Messages evaluated per run.
    pub limit: usize,
    /// Inbox messages synced before evaluation; 0 skips the sync.
    pub fetch: u32,
    pub api_base: String,
    /// Used when the stored token row carries no client secret.
    pub client_secret: Option<SecretString>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let user_email = get(USER_EMAIL_ENV).ok_or_else(|| ConfigError::MissingEnv {
            name: USER_EMAIL_ENV.to_string(),
        })?;

        let rules_path = PathBuf::from(expand_home(
            get(RULES_ENV).as_deref().unwrap_or(DEFAULT_RULES_PATH),
        ));

        let database_path = match get(DB_ENV) {
            Some(path) => PathBuf::from(expand_home(&path)),
            None => default_database_path().ok_or_else(|| ConfigError::InvalidEnv {
                name: DB_ENV.to_string(),
                reason: "home directory unknown; set an explicit database path".to_string(),
            })?,
        };

        let limit = parse_number(LIMIT_ENV, get(LIMIT_ENV))?.unwrap_or(DEFAULT_LIMIT);
        let fetch = parse_number(FETCH_ENV, get(FETCH_ENV))?.unwrap_or(0);

        let api_base = get(API_BASE_ENV).unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client_secret = resolve_secret_optional(
            get(CLIENT_SECRET_ENV).as_deref(),
            get(CLIENT_SECRET_FILE_ENV).as_deref(),
            None,
        )?;

        Ok(Self {
            user_email,
            rules_path,
            database_path,
            limit,
            fetch,
            api_base,
            client_secret,
        })
    }
}

/// Loads [`DOTENV_FILE`] from the working directory into the process
/// environment. See [`load_dotenv_from`].
pub fn load_dotenv() -> std::result::Result<Option<PathBuf>, ConfigError> {
    load_dotenv_from(Path::new(DOTENV_FILE))
}

/// Loads `KEY=value` lines from `path` into the process environment.
///
/// Variables already set are left alone. Returns `Ok(None)` when the file
/// does not exist.
pub fn load_dotenv_from(path: &Path) -> std::result::Result<Option<PathBuf>, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
) -> std::result::Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::InvalidEnv {
                name: name.to_string(),
                reason: format!("'{}': {}", v, e),
            })
        })
        .transpose()
}
