//! Error types for the DDNS job
//!
//! Every component returns [`Result`]; only the binary decides whether an
//! error terminates the process.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS job
#[derive(Error, Debug)]
pub enum Error {
    /// A required input is missing, empty, or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IP lookup transport, status, or body-read failure
    #[error("Network error: {0}")]
    Network(String),

    /// Credential or client configuration failure
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hosted zone not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The DNS provider rejected or failed a request
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message, as reported by the provider
        message: String,
    },

    /// JSON serialization errors (dry-run payload rendering)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Short, stable name of the error category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "input",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Provider { .. } => "provider",
            Self::Json(_) => "json",
        }
    }
}
