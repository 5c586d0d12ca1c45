//! Error types for the agentflow pipeline.
//!
//! The pipeline core knows a single failure class, [`CompletionError`]:
//! whatever goes wrong inside the completion client (network, auth, rate
//! limit, malformed response) surfaces as the same error and aborts the run.
//! Configuration problems and the binary's I/O are covered by
//! [`ConfigError`] and the umbrella [`AgentflowError`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for agentflow operations.
#[derive(Debug, Error)]
pub enum AgentflowError {
    /// A completion call failed and the workflow was aborted.
    #[error("{0}")]
    Completion(#[from] CompletionError),

    /// Settings could not be loaded or a client could not be built.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised when the completion client fails to produce text.
///
/// Failure modes are not distinguished; the message carries
/// whatever detail the client had.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Completion failed: {message}")]
pub struct CompletionError {
    /// Human-readable failure description.
    pub message: String,
}

impl CompletionError {
    /// Creates a new completion error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("CompletionError"));
        map.insert("message".to_string(), serde_json::json!(self.message));
        map
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Invalid JSON: {err}"))
    }
}

/// Errors raised while loading settings or wiring clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        /// The environment key.
        key: String,
        /// The raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A dotenv file exists but could not be read or parsed.
    #[error("Failed to read env file {path}: {reason}")]
    EnvFile {
        /// Path of the file.
        path: String,
        /// Underlying read or parse error.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Client configuration error: {0}")]
    Client(String),
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an env file error.
    #[must_use]
    pub fn env_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a client configuration error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client(message.into())
    }
}
