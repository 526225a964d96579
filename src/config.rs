//! Configuration management for Beatsmith
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from YAML files and environment variables.

use crate::error::{BeatsmithError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Beatsmith
///
/// Holds the provider settings, chat defaults, and storage location for
/// saved sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Interactive chat defaults
    #[serde(default)]
    pub chat: ChatConfig,

    /// Session storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider configuration
///
/// Specifies which assistant backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model for standard generation
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Model used when thinking mode is enabled
    #[serde(default = "default_thinking_model")]
    pub thinking_model: String,

    /// Model used for speech synthesis
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// API key; prefer the GEMINI_API_KEY env var or the keyring over
    /// writing this into the config file
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional API base URL (useful for tests and local mocks)
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_thinking_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            thinking_model: default_thinking_model(),
            tts_model: default_tts_model(),
            api_key: None,
            api_base: None,
        }
    }
}

/// Interactive chat configuration
///
/// Fidelity settings ride along with every outgoing prompt as the
/// `[Technical Specs]` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Sample rate label for the technical-specs prefix
    #[serde(default = "default_sample_rate")]
    pub sample_rate: String,

    /// Bit depth label for the technical-specs prefix
    #[serde(default = "default_bit_depth")]
    pub bit_depth: String,

    /// Enable thinking mode by default
    #[serde(default)]
    pub thinking: bool,

    /// Enable search grounding by default
    #[serde(default)]
    pub search: bool,
}

fn default_sample_rate() -> String {
    "44.1kHz".to_string()
}

fn default_bit_depth() -> String {
    "16-bit".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            bit_depth: default_bit_depth(),
            thinking: false,
            search: false,
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the session database; defaults to the platform data dir
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the directory holding the session database
    ///
    /// # Errors
    ///
    /// Returns error if no platform data directory can be determined
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", "beatsmith").ok_or_else(|| {
            BeatsmithError::Config("Could not determine platform data directory".to_string())
        })?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

impl Config {
    /// Load configuration from file with environment overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();

        Ok(config)
    }

    /// Default config file path under the platform config directory
    pub fn default_path() -> String {
        directories::ProjectDirs::from("", "", "beatsmith")
            .map(|dirs| {
                dirs.config_dir()
                    .join("config.yaml")
                    .to_string_lossy()
                    .into_owned()
            })
            .unwrap_or_else(|| "config.yaml".to_string())
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BeatsmithError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| BeatsmithError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("BEATSMITH_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("BEATSMITH_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(model) = std::env::var("BEATSMITH_THINKING_MODEL") {
            self.provider.gemini.thinking_model = model;
        }

        if let Ok(base) = std::env::var("BEATSMITH_API_BASE") {
            self.provider.gemini.api_base = Some(base);
        }

        if let Ok(dir) = std::env::var("BEATSMITH_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(rate) = std::env::var("BEATSMITH_SAMPLE_RATE") {
            self.chat.sample_rate = rate;
        }

        if let Ok(depth) = std::env::var("BEATSMITH_BIT_DEPTH") {
            self.chat.bit_depth = depth;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any field holds an unusable value
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "gemini" {
            return Err(BeatsmithError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }

        if self.provider.gemini.model.is_empty() {
            return Err(BeatsmithError::Config("Gemini model cannot be empty".to_string()).into());
        }

        if self.provider.gemini.thinking_model.is_empty() {
            return Err(
                BeatsmithError::Config("Thinking model cannot be empty".to_string()).into(),
            );
        }

        if self.chat.sample_rate.is_empty() || self.chat.bit_depth.is_empty() {
            return Err(BeatsmithError::Config(
                "Technical spec settings cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
