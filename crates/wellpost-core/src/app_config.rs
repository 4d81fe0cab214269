use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

/// Value shipped in sample `.env` files; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub image_size: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub image_download_timeout_secs: u64,
    pub image_retry_backoff_ms: u64,
    pub images_dir: PathBuf,
    pub profiles_path: Option<PathBuf>,
    pub mail_recipient: Option<String>,
    pub user_agent: String,
    /// Bearer keys accepted by the HTTP service (`WELLPOST_API_KEYS`).
    pub api_keys: Vec<String>,
}

impl AppConfig {
    /// Returns the API key, rejecting a missing, blank, or placeholder value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] or [`ConfigError::PlaceholderCredential`].
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        match self.openai_api_key.as_deref() {
            None | Some("") => Err(ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string())),
            Some(PLACEHOLDER_API_KEY) => Err(ConfigError::PlaceholderCredential(
                "OPENAI_API_KEY".to_string(),
            )),
            Some(key) => Ok(key),
        }
    }

    #[must_use]
    pub fn has_openai_api_key(&self) -> bool {
        self.require_openai_api_key().is_ok()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "image_download_timeout_secs",
                &self.image_download_timeout_secs,
            )
            .field("image_retry_backoff_ms", &self.image_retry_backoff_ms)
            .field("images_dir", &self.images_dir)
            .field("profiles_path", &self.profiles_path)
            .field("mail_recipient", &self.mail_recipient)
            .field("user_agent", &self.user_agent)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}
