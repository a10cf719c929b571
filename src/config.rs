//! Configuration management for Maguai
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::catalog;
use crate::error::{MaguaiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the upstream API credential
pub const API_KEY_ENV: &str = "API_KEY";

/// Default persona instruction sent with every request
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and highly intelligent AI assistant. \n\
Depending on the user's selected Maguai model, maintain a professional and helpful persona.\n\
You are currently powered by gemini-3-pro-preview. \n\
Always aim for accuracy, clarity, and depth in your responses.";

/// Main configuration structure for Maguai
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upstream provider configuration
    pub provider: ProviderConfig,
    /// Chat behavior configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which upstream provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Upstream model requests are sent to
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (overridable so tests can point at a mock server)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// HTTP timeout for a single request (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// API credential, read from the environment and never written to disk
    #[serde(default, skip_serializing)]
    pub api_key: String,
}

fn default_gemini_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_seconds() -> u64 {
    300
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            timeout_seconds: default_timeout_seconds(),
            api_key: String::new(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Catalog id selected when a session starts
    #[serde(default = "default_model_id")]
    pub default_model: String,

    /// Start sessions with thinking mode enabled
    #[serde(default)]
    pub thinking_mode: bool,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Reasoning token budget used when thinking mode is on
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// Ask the upstream to return its reasoning trace in thinking mode
    #[serde(default)]
    pub include_thoughts: bool,

    /// Persona instruction sent with every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_model_id() -> String {
    catalog::default_model().id.clone()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_thinking_budget() -> u32 {
    32768
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: default_model_id(),
            thinking_mode: false,
            temperature: default_temperature(),
            thinking_budget: default_thinking_budget(),
            include_thoughts: false,
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// When `path` does not exist the platform config directory is tried
    /// next, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = match Self::resolve_path(path) {
            Some(found) => Self::from_file(&found)?,
            None => {
                tracing::warn!("Config file not found at {}, using defaults", path);
                Self::default_config()
            }
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn resolve_path(path: &str) -> Option<PathBuf> {
        let direct = Path::new(path);
        if direct.exists() {
            return Some(direct.to_path_buf());
        }

        let fallback = directories::ProjectDirs::from("", "", "maguai")?
            .config_dir()
            .join("config.yaml");
        if fallback.exists() {
            tracing::debug!("Using config from {}", fallback.display());
            Some(fallback)
        } else {
            None
        }
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gemini".to_string(),
                gemini: GeminiConfig::default(),
            },
            chat: ChatConfig::default(),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MaguaiError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MaguaiError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // A missing key stays empty; the upstream rejects it on first use
        self.provider.gemini.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();

        if let Ok(provider_type) = std::env::var("MAGUAI_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("MAGUAI_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("MAGUAI_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if let Ok(timeout) = std::env::var("MAGUAI_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.gemini.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MAGUAI_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(model_id) = std::env::var("MAGUAI_DEFAULT_MODEL") {
            self.chat.default_model = model_id;
        }

        if let Ok(thinking) = std::env::var("MAGUAI_THINKING_MODE") {
            match thinking.parse::<bool>() {
                Ok(v) => {
                    self.chat.thinking_mode = v;
                    tracing::debug!(thinking_mode = v, "Env override: MAGUAI_THINKING_MODE");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for MAGUAI_THINKING_MODE: {}", thinking);
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Chat {
            model, thinking, ..
        } = &cli.command
        {
            if let Some(model_id) = model {
                self.chat.default_model = model_id.clone();
            }
            if *thinking {
                self.chat.thinking_mode = true;
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(MaguaiError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["gemini"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(MaguaiError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.gemini.model.trim().is_empty() {
            return Err(
                MaguaiError::Config("provider.gemini.model cannot be empty".to_string()).into(),
            );
        }

        if self.provider.gemini.timeout_seconds == 0 {
            return Err(MaguaiError::Config(
                "provider.gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(MaguaiError::Config(
                "chat.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.chat.thinking_budget == 0 {
            return Err(MaguaiError::Config(
                "chat.thinking_budget must be greater than 0".to_string(),
            )
            .into());
        }

        if catalog::find_model(&self.chat.default_model).is_none() {
            return Err(MaguaiError::UnknownModel(self.chat.default_model.clone()).into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
