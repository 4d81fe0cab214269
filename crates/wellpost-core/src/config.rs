use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parsing and validation decoupled from the real environment so tests can
/// pass a `HashMap` lookup.
///
/// `OPENAI_API_KEY` is optional here: the pipeline checks it before each
/// backend call so a server without credentials still starts and reports
/// itself degraded.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("WELLPOST_ENV", "development"))?;

    let bind_addr = or_default("WELLPOST_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("WELLPOST_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("WELLPOST_LOG_LEVEL", "info");

    let openai_api_key = optional("OPENAI_API_KEY").map(|key| key.trim().to_string());
    let openai_base_url = or_default("WELLPOST_OPENAI_BASE_URL", "https://api.openai.com/v1");
    let text_model = or_default("WELLPOST_TEXT_MODEL", "gpt-3.5-turbo");
    let image_model = or_default("WELLPOST_IMAGE_MODEL", "dall-e-3");
    let image_size = or_default("WELLPOST_IMAGE_SIZE", "1024x1024");

    let temperature = parse_temperature(&or_default("WELLPOST_TEMPERATURE", "0.7"))?;

    let request_timeout_secs = parse_u64("WELLPOST_REQUEST_TIMEOUT_SECS", "60")?;
    let image_download_timeout_secs = parse_u64("WELLPOST_IMAGE_DOWNLOAD_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid("WELLPOST_REQUEST_TIMEOUT_SECS", "must be > 0".to_string()));
    }
    if image_download_timeout_secs == 0 {
        return Err(invalid(
            "WELLPOST_IMAGE_DOWNLOAD_TIMEOUT_SECS",
            "must be > 0".to_string(),
        ));
    }
    let image_retry_backoff_ms = parse_u64("WELLPOST_IMAGE_RETRY_BACKOFF_MS", "500")?;

    let images_dir = PathBuf::from(or_default("WELLPOST_IMAGES_DIR", "./images"));
    let profiles_path = optional("WELLPOST_PROFILES_PATH").map(PathBuf::from);
    let mail_recipient = optional("WELLPOST_MAIL_RECIPIENT");
    let user_agent = or_default("WELLPOST_USER_AGENT", "wellpost/0.1 (post-generation)");
    let api_keys = or_default("WELLPOST_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        openai_api_key,
        openai_base_url,
        text_model,
        image_model,
        image_size,
        temperature,
        request_timeout_secs,
        image_download_timeout_secs,
        image_retry_backoff_ms,
        images_dir,
        profiles_path,
        mail_recipient,
        user_agent,
        api_keys,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WELLPOST_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

/// Sampling temperature accepted by the chat completions API: `0.0..=2.0`.
fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "WELLPOST_TEMPERATURE".to_string(),
        reason,
    };
    let value = raw.parse::<f32>().map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(invalid(format!("must be between 0.0 and 2.0, got {value}")));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
