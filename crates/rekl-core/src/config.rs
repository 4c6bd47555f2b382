//! Configuration file for REKL.
//!
//! Loads presets from ${REKL_HOME}/config.toml with sensible defaults. The file
//! only seeds the [`ConfigStore`] at startup; nothing is written back.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{ConfigStore, INIT_SPEED};

/// Keyer device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyerConfig {
    /// Serial device for the DTR key.
    pub port: PathBuf,
    /// Sidetone frequency for the beep key.
    pub tone_hz: f32,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            port: PathBuf::from(KeyerConfig::DEFAULT_PORT),
            tone_hz: KeyerConfig::DEFAULT_TONE_HZ,
        }
    }
}

impl KeyerConfig {
    pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
    pub const DEFAULT_TONE_HZ: f32 = 700.0;
}

/// Log file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive (e.g. "info", "rekl_core=debug").
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speed in WPM at startup.
    pub speed: i32,

    /// Preset messages keyed by slot number ("0" to "9").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<String, String>,

    #[serde(default)]
    pub keyer: KeyerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: INIT_SPEED,
            messages: BTreeMap::new(),
            keyer: KeyerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

pub mod paths {
    //! Path resolution for REKL configuration and logs.
    //!
    //! REKL_HOME resolution order:
    //! 1. REKL_HOME environment variable (if set)
    //! 2. ~/.config/rekl (default)

    use std::path::PathBuf;

    /// Returns the REKL home directory.
    pub fn rekl_home() -> PathBuf {
        if let Ok(home) = std::env::var("REKL_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("rekl"))
            .unwrap_or_else(|| PathBuf::from(".rekl"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        rekl_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn log_dir() -> PathBuf {
        rekl_home()
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# REKL configuration

# Speed in WPM at startup (5-50).
speed = 18

# Saved messages, sent with Shift+N. Keys are slot numbers 0-9.
[messages]
# 1 = "CQ CQ CQ DE N0CALL N0CALL K"
# 2 = "TU 5NN"

[keyer]
# Serial device for the DTR key (overridden by --port).
port = "/dev/ttyUSB0"
# Sidetone frequency for --beep.
tone_hz = 700.0

[log]
# tracing filter for ${REKL_HOME}/rekl.log
filter = "info"
"#;

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file already exists or can't be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, DEFAULT_CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Seeds a store with the configured speed and messages.
    ///
    /// Invalid entries are skipped and returned as warnings; the store keeps
    /// its defaults for them.
    pub fn apply_to(&self, store: &mut ConfigStore) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Err(err) = store.set_speed(self.speed) {
            warnings.push(format!("Config speed {} ignored: {err}", self.speed));
        }

        for (key, text) in &self.messages {
            let Ok(slot) = key.trim().parse::<i32>() else {
                warnings.push(format!("Config message key '{key}' is not a slot number"));
                continue;
            };
            if let Err(err) = store.set_message(slot, text) {
                warnings.push(format!("Config message {key} ignored: {err}"));
            }
        }

        warnings
    }
}
