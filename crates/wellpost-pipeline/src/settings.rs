use std::path::PathBuf;
use std::time::Duration;

use wellpost_core::AppConfig;

use crate::error::PipelineError;

/// Runtime knobs injected into pipeline components, derived once from
/// [`AppConfig`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Sampling temperature for post generation.
    pub post_temperature: f32,
    /// Why credentials are unusable, if they are. Checked before every
    /// request that would reach a backend.
    pub credential_error: Option<String>,
    pub images_dir: PathBuf,
    pub image_download_timeout: Duration,
    /// Base delay between image download attempts; `0` retries immediately.
    pub image_retry_backoff_ms: u64,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            post_temperature: config.temperature,
            credential_error: config.require_openai_api_key().err().map(|e| e.to_string()),
            images_dir: config.images_dir.clone(),
            image_download_timeout: Duration::from_secs(config.image_download_timeout_secs),
            image_retry_backoff_ms: config.image_retry_backoff_ms,
        }
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] when credentials are missing
    /// or still set to the placeholder value.
    pub fn ensure_credentials(&self) -> Result<(), PipelineError> {
        match &self.credential_error {
            Some(reason) => Err(PipelineError::Configuration(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            post_temperature: 0.7,
            credential_error: None,
            images_dir: PathBuf::from("./images"),
            image_download_timeout: Duration::from_secs(30),
            image_retry_backoff_ms: 500,
        }
    }
}
