//! Failure taxonomy shared by every step and the runner.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Missing required file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Missing required environment variable: {0}")]
    MissingKey(String),
    #[error("Failed to parse `{}`: {reason}", .path.display())]
    CorruptFile { path: PathBuf, reason: String },
    #[error("HTTP request failed: {0}")]
    Transport(String),
    /// An empty `body` means the step already printed it.
    #[error("{context} (status {status}){}", body_suffix(.body))]
    UnexpectedStatus {
        context: String,
        status: u16,
        body: String,
    },
    #[error("Response did not contain valid JSON data.")]
    InvalidJson,
    #[error("{0}")]
    Validation(String),
    #[error("Books file must contain at least two ISBN entries to proceed (found {found}).")]
    InsufficientBooks { found: usize },
    #[error("Password length must be at least {min} characters (got {length})")]
    InvalidLength { length: usize, min: usize },
    #[error("Failed to write `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

impl FlowError {
    /// Taxonomy bucket, used as a structured log field.
    pub fn category(&self) -> &'static str {
        match self {
            FlowError::MissingFile(_) | FlowError::MissingKey(_) | FlowError::CorruptFile { .. } => {
                "configuration"
            }
            FlowError::Transport(_) => "transport",
            FlowError::UnexpectedStatus { .. } | FlowError::InvalidJson => "protocol",
            FlowError::Validation(_)
            | FlowError::InsufficientBooks { .. }
            | FlowError::InvalidLength { .. } => "validation",
            FlowError::Io { .. } => "io",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlowError::Io {
            path: path.into(),
            source,
        }
    }
}
