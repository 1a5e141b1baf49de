use thiserror::Error;

/// Errors that can occur during recipe search operations
#[derive(Error, Debug)]
pub enum SearchError {
    /// The primary search input was empty or whitespace-only
    #[error("Search input is empty")]
    EmptyQuery,

    /// No API key was configured
    #[error("API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as returned by the API
        message: String,
    },

    /// The response body could not be decoded as the expected JSON shape
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SearchError {
    /// Whether a list call that failed with this error is worth one more attempt.
    ///
    /// Transport-level failures and 5xx/429 responses are transient; everything
    /// else (bad input, auth, decode failures) will fail again identically.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::EmptyQuery
            | Self::MissingApiKey
            | Self::MalformedResponse(_)
            | Self::Config(_) => false,
        }
    }
}
