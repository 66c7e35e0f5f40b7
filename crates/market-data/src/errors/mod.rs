//! Error types for fetching quotes from upstream.
//!
//! [`FetchError`] distinguishes an upstream that could not be reached from one
//! that answered with a payload we cannot use. Neither is retried here; the
//! cache manager waits for the next trigger.

use thiserror::Error;

/// Errors that can occur while fetching a quote from an upstream provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The provider was unreachable, the connection failed, the request
    /// timed out, or the provider answered with a non-success HTTP status.
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The provider answered but the payload is missing required fields.
    #[error("Malformed response: {provider} - {message}")]
    MalformedResponse {
        /// The provider that returned the payload
        provider: String,
        /// Which part of the payload was unusable
        message: String,
    },
}

impl FetchError {
    pub fn network(provider: &str, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// The provider this error came from.
    pub fn provider(&self) -> &str {
        match self {
            Self::Network { provider, .. } | Self::MalformedResponse { provider, .. } => provider,
        }
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}
