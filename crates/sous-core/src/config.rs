//! Configuration file management for Sous.
//!
//! Supports reading secrets from `~/.config/sous/secret.json`:
//!
//! ```json
//! { "gemini": { "api_key": "...", "text_model": "gemini-3-pro-preview" } }
//! ```
//!
//! The `GEMINI_API_KEY` environment variable takes precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SousError};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub text_model: Option<String>,
    #[serde(default)]
    pub chat_model: Option<String>,
    #[serde(default)]
    pub image_model: Option<String>,
    /// Override for the REST endpoint prefix (proxies, tests).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("text_model", &self.text_model)
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn chat_model(&self) -> &str {
        self.chat_model.as_deref().unwrap_or(DEFAULT_CHAT_MODEL)
    }

    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

impl SecretConfig {
    /// Reads and parses a secret file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SousError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SousError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies an API key taken from the environment, creating the Gemini
    /// section if the file had none. Blank keys are ignored.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            match self.gemini.as_mut() {
                Some(gemini) => gemini.api_key = key,
                None => self.gemini = Some(GeminiConfig::new(key)),
            }
        }
        self
    }

    /// Returns the Gemini section, failing if no usable key is configured.
    pub fn require_gemini(&self) -> Result<&GeminiConfig> {
        self.gemini
            .as_ref()
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| {
                SousError::config(format!(
                    "Gemini API key not configured; set {API_KEY_ENV} or add it to secret.json"
                ))
            })
    }
}

/// Loads `~/.config/sous/secret.json` (if present) and applies the
/// environment override.
pub fn load_secret_config() -> Result<SecretConfig> {
    let path = get_config_path()?;
    let config = if path.exists() {
        SecretConfig::from_path(&path)?
    } else {
        SecretConfig::default()
    };
    Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
}

/// Returns the path to the configuration file: ~/.config/sous/secret.json
pub fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SousError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("sous").join("secret.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_path_reads_models() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        write!(
            file,
            r#"{{"gemini": {{"api_key": "k-123", "image_model": "imagen-x"}}}}"#
        )
        .unwrap();

        let config = SecretConfig::from_path(file.path()).unwrap();
        let gemini = config.require_gemini().unwrap();
        assert_eq!(gemini.api_key, "k-123");
        assert_eq!(gemini.image_model(), "imagen-x");
        assert_eq!(gemini.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(gemini.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_path_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        write!(file, "{{ not json").unwrap();

        let err = SecretConfig::from_path(file.path()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_env_override_wins() {
        let config = SecretConfig {
            gemini: Some(GeminiConfig::new("from-file")),
        }
        .with_api_key_override(Some("from-env".to_string()));
        assert_eq!(config.require_gemini().unwrap().api_key, "from-env");

        let config = SecretConfig::default().with_api_key_override(Some("only-env".into()));
        assert_eq!(config.require_gemini().unwrap().api_key, "only-env");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = SecretConfig::default().with_api_key_override(Some("  ".into()));
        assert!(config.require_gemini().unwrap_err().is_config());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
