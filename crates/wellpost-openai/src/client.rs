//! HTTP client for the OpenAI REST API.
//!
//! Wraps `reqwest` with bearer-token auth, typed request/response bodies, and
//! status-code classification into [`OpenAiError`] variants. Every method is a
//! single attempt; callers own any retry policy.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};

use crate::error::OpenAiError;
use crate::types::{
    ApiErrorEnvelope, ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_USER_AGENT: &str = "wellpost/0.1 (post-generation)";

/// Client for the OpenAI REST API.
///
/// Use [`OpenAiClient::new`] for production or [`OpenAiClient::with_base_url`]
/// to point at a compatible gateway or a mock server in tests.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, OpenAiError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL, DEFAULT_USER_AGENT)
    }

    /// Creates a new client with a custom base URL and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`OpenAiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, OpenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment (e.g. `/v1`).
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OpenAiError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Sends a chat completion and returns the first choice's message content.
    ///
    /// # Errors
    ///
    /// - [`OpenAiError::Auth`] on 401/403, [`OpenAiError::RateLimited`] on 429,
    ///   [`OpenAiError::Api`] on any other non-2xx status.
    /// - [`OpenAiError::Http`] on network failure.
    /// - [`OpenAiError::Deserialize`] if the body does not match the expected shape.
    /// - [`OpenAiError::EmptyResponse`] if there is no choice or no content.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<String, OpenAiError> {
        let url = self.endpoint("chat/completions")?;
        tracing::debug!(model = request.model, "sending chat completion");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        let body = Self::check_status(response).await?.text().await?;

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| OpenAiError::Deserialize {
                context: "chat/completions".to_string(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::EmptyResponse("chat/completions".to_string()))
    }

    /// Requests one generated image and returns its hosted URL.
    ///
    /// # Errors
    ///
    /// Same classification as [`OpenAiClient::chat_completion`];
    /// [`OpenAiError::EmptyResponse`] if no URL is returned.
    pub async fn create_image(
        &self,
        request: &ImageGenerationRequest<'_>,
    ) -> Result<String, OpenAiError> {
        let url = self.endpoint("images/generations")?;
        tracing::debug!(model = request.model, size = request.size, "requesting image");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        let body = Self::check_status(response).await?.text().await?;

        let parsed: ImageGenerationResponse =
            serde_json::from_str(&body).map_err(|e| OpenAiError::Deserialize {
                context: "images/generations".to_string(),
                source: e,
            })?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| OpenAiError::EmptyResponse("images/generations".to_string()))
    }

    /// Downloads a generated asset. Asset URLs are pre-signed, so no bearer
    /// token is sent. `timeout` bounds this one request.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::Http`] on network failure or timeout, and the
    /// usual status classification on non-2xx responses.
    pub async fn download(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, OpenAiError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let bytes = Self::check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, path: &str) -> Result<Url, OpenAiError> {
        self.base_url
            .join(path)
            .map_err(|e| OpenAiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Passes 2xx responses through and classifies everything else.
    async fn check_status(response: Response) -> Result<Response, OpenAiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = Self::error_message(&body, status);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OpenAiError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => OpenAiError::RateLimited(message),
            _ => OpenAiError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Extracts `error.message` from an API error body, falling back to the
    /// HTTP reason phrase.
    fn error_message(body: &str, status: StatusCode) -> String {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            })
    }
}
