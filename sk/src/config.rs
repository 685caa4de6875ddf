//! Sidekick configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{DEFAULT_DISPLAY_EVERY, DEFAULT_MAX_TOKENS};

/// Main Sidekick configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote provider configuration
    pub remote: RemoteConfig,

    /// Generation loop defaults
    pub generation: GenerationConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks the provider name, provider-specific required fields, and the
    /// API key environment variable. Call this early in startup to fail fast
    /// with clear error messages.
    pub fn validate(&self) -> Result<()> {
        match self.remote.provider.as_str() {
            "openai" => {}
            "azure" => {
                if self.remote.resource.is_none() {
                    return Err(eyre::eyre!("Azure provider requires remote.resource to be set."));
                }
                if self.remote.deployment.is_none() {
                    return Err(eyre::eyre!("Azure provider requires remote.deployment to be set."));
                }
            }
            other => {
                return Err(eyre::eyre!(
                    "Unknown remote provider: '{}'. Supported: openai, azure",
                    other
                ));
            }
        }

        if std::env::var(&self.remote.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Remote API key not found. Set the {} environment variable.",
                self.remote.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .sidekick.yml
        let local_config = PathBuf::from(".sidekick.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/sidekick/sidekick.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sidekick").join("sidekick.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Remote provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Provider name ("openai" or "azure")
    pub provider: String,

    /// Model identifier sent with OpenAI requests
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Base URL override; the provider default applies when unset
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Azure api-version query parameter
    #[serde(rename = "api-version")]
    pub api_version: String,

    /// Azure resource name, forms the endpoint host
    pub resource: Option<String>,

    /// Azure deployment name, forms the completion path
    pub deployment: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
            timeout_ms: 120_000,
            api_version: "2023-05-15".to_string(),
            resource: None,
            deployment: None,
        }
    }
}

impl RemoteConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            eyre::eyre!(
                "Remote API key not found. Set the {} environment variable.",
                self.api_key_env
            )
        })
    }
}

/// Generation loop defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Token budget per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Emit partial output every N tokens while streaming
    #[serde(rename = "display-every")]
    pub display_every: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            display_every: DEFAULT_DISPLAY_EVERY,
        }
    }
}
