use thiserror::Error;

/// Errors returned by [`crate::OpenAiClient`].
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401/403: missing, revoked, or wrong API key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// HTTP 429: rate limit or quota exhausted.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx response that carried no usable content.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl OpenAiError {
    /// `true` for connect failures and timeouts.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, OpenAiError::Http(e) if e.is_connect() || e.is_timeout())
    }
}
