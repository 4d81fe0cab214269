//! Backend seams. Pipeline components depend on these traits so tests can
//! swap in stubs; [`OpenAiBackend`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use wellpost_core::AppConfig;
use wellpost_openai::{ChatCompletionRequest, ImageGenerationRequest, OpenAiClient, OpenAiError};

use crate::error::BackendError;

/// Text generation: one system instruction plus one user message in, raw text out.
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn invoke(
        &self,
        system_instruction: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String, BackendError>;
}

/// Image generation plus download of the hosted asset.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Returns the URL of a freshly generated image.
    async fn request_image(&self, prompt: &str) -> Result<String, BackendError>;

    /// Fetches the bytes behind `url`, bounded by `timeout`.
    async fn download(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, BackendError>;
}

/// [`TextBackend`] and [`ImageBackend`] over the OpenAI REST API.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: OpenAiClient,
    text_model: String,
    image_model: String,
    image_size: String,
}

impl OpenAiBackend {
    #[must_use]
    pub fn new(client: OpenAiClient, text_model: &str, image_model: &str, image_size: &str) -> Self {
        Self {
            client,
            text_model: text_model.to_string(),
            image_model: image_model.to_string(),
            image_size: image_size.to_string(),
        }
    }

    /// Builds the client from configuration. A missing API key is not an
    /// error here: requests are rejected before they reach the backend.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError`] if the HTTP client cannot be built or the base
    /// URL is invalid.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, OpenAiError> {
        let client = OpenAiClient::with_base_url(
            config.openai_api_key.as_deref().unwrap_or_default(),
            config.request_timeout_secs,
            &config.openai_base_url,
            &config.user_agent,
        )?;
        Ok(Self::new(
            client,
            &config.text_model,
            &config.image_model,
            &config.image_size,
        ))
    }
}

#[async_trait]
impl TextBackend for OpenAiBackend {
    async fn invoke(
        &self,
        system_instruction: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String, BackendError> {
        let request =
            ChatCompletionRequest::new(&self.text_model, system_instruction, user_message, temperature);
        Ok(self.client.chat_completion(&request).await?)
    }
}

#[async_trait]
impl ImageBackend for OpenAiBackend {
    async fn request_image(&self, prompt: &str) -> Result<String, BackendError> {
        let request = ImageGenerationRequest::new(&self.image_model, prompt, &self.image_size);
        Ok(self.client.create_image(&request).await?)
    }

    async fn download(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, BackendError> {
        Ok(self.client.download(url, timeout).await?)
    }
}
