use std::env;

use tracing::info;

use crate::error::CivicError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    // AI provider
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` (or `API_KEY`) is required. `GEMINI_MODEL` and
    /// `GEMINI_BASE_URL` are optional.
    pub fn from_env() -> Result<Self, CivicError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CivicError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| {
                CivicError::Config("GEMINI_API_KEY (or API_KEY) environment variable is required".into())
            })?;

        Ok(Self {
            gemini_api_key,
            gemini_model: non_empty("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: non_empty("GEMINI_BASE_URL"),
        })
    }

    /// Log the loaded configuration with the credential masked.
    pub fn log_redacted(&self) {
        info!(
            gemini_model = self.gemini_model.as_str(),
            gemini_base_url = self.gemini_base_url.as_deref().unwrap_or("default"),
            gemini_api_key = redact(&self.gemini_api_key).as_str(),
            "Loaded configuration"
        );
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .finish()
    }
}

fn redact(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{tail}")
    }
}
