//! Shared platform types, prompt profiles, and configuration for wellpost.

mod app_config;
mod config;
pub mod error;
pub mod platform;
pub mod profiles;

pub use app_config::{AppConfig, Environment, PLACEHOLDER_API_KEY};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::{ConfigError, UnsupportedPlatformError};
pub use platform::Platform;
pub use profiles::{FormatStyle, PlatformProfile, PostTemplate, PromptTemplateRegistry};
