/*!
 * Error types for the deepl-bridge crate.
 *
 * Provider failures are modelled as data so callers can tell a rejected
 * request from an unreachable host or an undecodable body. None of these
 * escape `TranslationService::translate`, which degrades them to an
 * untranslated outcome.
 */

use thiserror::Error;

/// Errors that can occur when talking to the DeepL API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request could not be built or sent
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The host could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// No response within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Error status returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// 401/403 from the API
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 429 from the API
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The body arrived but could not be decoded
    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Whether the provider rejected the request (4xx class)
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::ApiError { status_code, .. } => (400..500).contains(status_code),
            Self::AuthenticationError(_) | Self::RateLimitExceeded(_) => true,
            _ => false,
        }
    }

    /// Whether the failure happened below the HTTP status layer
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::Timeout(_)
        )
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::Timeout(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Build an error from a non-success status and the response body
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError {
                status_code,
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        // Timeouts are mapped by the client, which knows the configured duration
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Errors raised while tearing down or provisioning glossaries
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The remote listing failed, nothing was deleted
    #[error("Failed to list remote glossaries: {0}")]
    Listing(#[source] ProviderError),

    /// The remote create call failed
    #[error("Failed to create glossary for {pair}: {source}")]
    Provisioning {
        /// Language pair the glossary was meant for
        pair: String,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// Glossary entries were rejected before any remote call
    #[error("Invalid glossary entries: {0}")]
    InvalidEntries(String),

    /// Local registry access failed
    #[error("Glossary registry error: {0}")]
    Registry(#[from] anyhow::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from glossary lifecycle operations
    #[error("Glossary error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
