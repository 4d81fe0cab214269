use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{0} is set to the placeholder value; provide a real credential")]
    PlaceholderCredential(String),

    #[error("failed to read profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("profile validation failed: {0}")]
    Validation(String),
}

/// A platform value outside the closed set `instagram`, `facebook`, `linkedin`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported platform: '{0}' (expected one of: instagram, facebook, linkedin)")]
pub struct UnsupportedPlatformError(pub String);
