//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\plant-scan\config.toml
//! - macOS: ~/Library/Application Support/plant-scan/config.toml
//! - Linux: ~/.config/plant-scan/config.toml
//!
//! The identification endpoint and its API key are never compiled in. They
//! come from this file or from the command line / environment
//! (`PLANT_ID_ENDPOINT`, `PLANT_ID_API_KEY`). For plant.id the endpoint is
//! `https://api.plant.id/v2/identify`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bound on a single identification transfer.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// JPEG quality the picker re-encodes at. Policy value, not a user option.
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Identification service settings
    pub identification: IdentificationConfig,

    /// Image acquisition settings
    pub acquisition: AcquisitionConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Key sent in the `Api-Key` header of every identification request
    pub plant_id_api_key: Option<String>,
}

/// Identification endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationConfig {
    /// Full URL of the identification endpoint
    pub endpoint: Option<String>,

    /// Transfer timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Image acquisition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// JPEG quality (1-100) used when encoding the picked image
    pub jpeg_quality: u8,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Validated settings for the identification client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationSettings {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Config {
    /// Layer command-line values (which clap already merged with the
    /// environment) over the file values. `None` keeps the file value.
    pub fn with_overrides(
        mut self,
        api_key: Option<String>,
        endpoint: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if api_key.is_some() {
            self.credentials.plant_id_api_key = api_key;
        }
        if endpoint.is_some() {
            self.identification.endpoint = endpoint;
        }
        if let Some(secs) = timeout_secs {
            self.identification.timeout_secs = secs;
        }
        self
    }

    /// Check that everything the identification client needs is present.
    pub fn identification_settings(&self) -> Result<IdentificationSettings, ConfigError> {
        let api_key = self
            .credentials
            .plant_id_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint = self
            .identification
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(endpoint.to_string()));
        }

        if self.identification.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(IdentificationSettings {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(self.identification.timeout_secs),
        })
    }

    /// JPEG quality clamped to the range the encoder accepts.
    pub fn jpeg_quality(&self) -> u8 {
        self.acquisition.jpeg_quality.clamp(1, 100)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plant-scan"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)?;
    Ok(path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No identification API key configured (set PLANT_ID_API_KEY or credentials.plant_id_api_key)")]
    MissingApiKey,

    #[error("No identification endpoint configured (set PLANT_ID_ENDPOINT or identification.endpoint)")]
    MissingEndpoint,

    #[error("Identification endpoint must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),

    #[error("Transfer timeout must be at least one second")]
    InvalidTimeout,

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
