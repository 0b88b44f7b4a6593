/*!
 * Error types, one enum per component.
 *
 * `AppError` collects them at the binary boundary; library code returns the
 * narrow type and callers add context with `anyhow`.
 */

use thiserror::Error;

/// Errors raised while segmenting a page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The sentinel label is missing or not followed by a Hebrew line
    #[error("No root found on page (sentinel label '{sentinel}' missing or not followed by Hebrew text)")]
    NoRoot {
        /// Sentinel label that was searched for
        sentinel: String,
    },
}

/// Failures while turning a PDF into lines
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document could not be read from disk
    #[error("Failed to read document: {0}")]
    Read(String),

    /// The document was read but text extraction failed
    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

/// Failures persisting the published-root history
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Filesystem failure
    #[error("Ledger I/O error: {0}")]
    Io(String),

    /// Ledger content could not be encoded
    #[error("Ledger serialization error: {0}")]
    Serialization(String),
}

/// Failures talking to an LLM or messaging endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure that is neither connect nor decode
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Body did not match the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Non-success status not covered below
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        status_code: u16,
        message: String,
    },

    /// Connect failure or timeout
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP 429
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// HTTP 401 or 403
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether a retry has a chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) | Self::RequestFailed(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Top-level error for the binary
#[derive(Error, Debug)]
pub enum AppError {
    /// Local filesystem failure
    #[error("File error: {0}")]
    File(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Anything surfaced through `anyhow`
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
