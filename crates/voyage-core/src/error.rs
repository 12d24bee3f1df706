//! Error types for the presentation core.

/// Failure to load a single texture resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("load of {path} was aborted")]
    Aborted { path: String },
}

impl LoadError {
    /// Path of the resource that failed.
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Decode { path, .. } | Self::Aborted { path } => path,
        }
    }
}

/// Error type for presentation configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
