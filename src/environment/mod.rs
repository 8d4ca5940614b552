//! # Run Configuration & Session State
//!
//! [`FlowConfig`] is built once from the command line and handed to every
//! step. [`Session`] is a read-only snapshot of the key=value session file
//! taken when a step starts; steps add keys through the store, never through
//! the snapshot.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::FlowError;
use crate::storage::{EnvStore, EnvValues};

pub const USERNAME_KEY: &str = "DEMOQA_USERNAME";
pub const PASSWORD_KEY: &str = "DEMOQA_PASSWORD";
pub const USER_ID_KEY: &str = "DEMOQA_USER_ID";
pub const TOKEN_KEY: &str = "DEMOQA_TOKEN";

pub const DEFAULT_BASE_URL: &str = "https://demoqa.com";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_BOOKS_FILE: &str = "test_books.json";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub base_url: String,
    pub env_file: PathBuf,
    pub books_file: PathBuf,
    pub timeout: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            books_file: PathBuf::from(DEFAULT_BOOKS_FILE),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl FlowConfig {
    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn env_store(&self) -> EnvStore {
        EnvStore::new(&self.env_file)
    }
}

/// Credentials, user id and token accumulated by earlier steps.
#[derive(Debug, Clone, Default)]
pub struct Session {
    values: EnvValues,
}

impl Session {
    /// Snapshot the session file. The file must already exist.
    pub fn open(store: &EnvStore) -> Result<Self, FlowError> {
        if !store.exists() {
            return Err(FlowError::MissingFile(store.path().to_path_buf()));
        }
        Ok(Self {
            values: store.load()?,
        })
    }

    pub fn from_values(values: EnvValues) -> Self {
        Self { values }
    }

    /// Value for `key`; absent and empty are both fatal.
    pub fn require(&self, key: &str) -> Result<&str, FlowError> {
        match self.values.get(key).map(String::as_str) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(FlowError::MissingKey(key.to_string())),
        }
    }
}
