//! TOML Configuration File Support
//!
//! Centralized configuration loading for the tutor client, supporting a
//! TOML file at `~/.config/study-bright/tutor.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! base_url = "https://api.openai.com/v1"
//! api_key = "sk-..."
//! model = "gpt-4o-mini"
//! request_timeout_secs = 120
//!
//! [reveal]
//! chars_per_tick = 3
//! tick_interval_ms = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reveal::RevealConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Backend section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendToml {
    /// Base URL of the chat backend (OpenAI-compatible)
    pub base_url: Option<String>,

    /// API key for bearer authentication
    pub api_key: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Reveal section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealToml {
    /// Characters revealed per tick
    pub chars_per_tick: Option<usize>,

    /// Tick interval in milliseconds
    pub tick_interval_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorToml {
    /// Backend configuration section
    pub backend: BackendToml,

    /// Reveal pacing section
    pub reveal: RevealToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Consolidated tutor client configuration.
///
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug)]
pub struct TutorConfig {
    /// Base URL of the chat backend
    pub base_url: String,

    /// API key for bearer authentication (optional for local backends)
    pub api_key: Option<String>,

    /// Model identifier sent with each request
    pub model: String,

    /// Request timeout
    pub request_timeout: Duration,

    /// Reveal pacing
    pub reveal: RevealConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    pub(crate) source: ConfigSource,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(120),
            reveal: RevealConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl TutorConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/study-bright/tutor.toml` or
/// `~/.config/study-bright/tutor.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("study-bright").join("tutor.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<TutorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<TutorConfig, ConfigError> {
    let mut config = TutorConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: TutorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut TutorConfig, toml: &TutorToml) {
    if let Some(ref url) = toml.backend.base_url {
        config.base_url = url.clone();
    }
    if toml.backend.api_key.is_some() {
        config.api_key = toml.backend.api_key.clone();
    }
    if let Some(ref model) = toml.backend.model {
        config.model = model.clone();
    }
    if let Some(secs) = toml.backend.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    if let Some(chars) = toml.reveal.chars_per_tick {
        config.reveal.chars_per_tick = chars.max(1);
    }
    if let Some(ms) = toml.reveal.tick_interval_ms {
        config.reveal.tick_interval = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut TutorConfig) {
    if let Ok(url) = std::env::var("STUDYBRIGHT_BASE_URL") {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(key) = std::env::var("STUDYBRIGHT_API_KEY") {
        config.api_key = Some(key);
        config.source = ConfigSource::Env;
    }
    if let Ok(model) = std::env::var("STUDYBRIGHT_MODEL") {
        config.model = model;
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("STUDYBRIGHT_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
