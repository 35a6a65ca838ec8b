use thiserror::Error;

/// Result type alias for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Errors that can occur inside individual checks.
///
/// These never cross the engine boundary: the scoring engine converts every
/// failure into metric data (`status`, `errors`) and always produces a
/// [`ScoringResult`](crate::ScoringResult).
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Input URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Operation exceeded its configured timeout
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// TLS handshake or inspection failed
    #[error("TLS inspection failed: {0}")]
    Tls(String),

    /// Certificate could not be parsed
    #[error("certificate parse failed: {0}")]
    CertParse(String),

    /// WHOIS lookup failed
    #[error("WHOIS lookup failed: {0}")]
    Whois(String),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// External API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScoreError {
    /// Returns true if the error came from a network-level failure
    /// (as opposed to a parse or configuration problem).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout(_) | Self::Tls(_) | Self::Whois(_) | Self::Dns(_)
        )
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
