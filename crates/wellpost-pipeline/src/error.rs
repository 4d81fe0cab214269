use thiserror::Error;
use wellpost_core::UnsupportedPlatformError;
use wellpost_openai::OpenAiError;

/// Shown instead of raw auth/connectivity errors so callers get an actionable hint.
pub const CONNECTION_HINT: &str =
    "OpenAI API connection failed. Check your API key and internet connection.";

/// A text or image backend call failed (auth, network, quota, bad reply).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("backend error: {0}")]
    Other(String),
}

impl From<OpenAiError> for BackendError {
    fn from(err: OpenAiError) -> Self {
        if err.is_connection() {
            return BackendError::Connection(err.to_string());
        }
        match err {
            OpenAiError::Auth(msg) => BackendError::Auth(msg),
            OpenAiError::RateLimited(msg) => BackendError::RateLimited(msg),
            other => BackendError::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatformError),

    /// Missing or placeholder credentials, detected before any backend call.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),
}

impl PipelineError {
    /// Human-readable, non-empty message for failed results.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::BackendUnavailable(
                BackendError::Auth(_) | BackendError::Connection(_),
            ) => CONNECTION_HINT.to_string(),
            PipelineError::Configuration(msg) => format!("OpenAI API key not configured: {msg}"),
            other => other.to_string(),
        }
    }
}
