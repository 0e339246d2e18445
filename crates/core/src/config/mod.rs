//! Extension configuration
//!
//! Settings come from the host project configuration (`game.project`), read
//! through a [`ConfigSource`], or from a standalone `discordrich.toml`:
//!
//! ```toml
//! [discordrich]
//! lib_path = "native/discord-rpc"
//! debug = false
//! ```
//!
//! Missing sections and keys fall back to their defaults.

mod loader;

use std::path::Path;

use serde::Deserialize;

use discordrich_loader::{ConfigSource, LIB_PATH_KEY};

pub use loader::{config_path, CONFIG_FILE_NAME};

/// Project configuration key enabling debug logging
pub const DEBUG_KEY: &str = "discordrich.debug";

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Could not determine config directory from the executable location
    #[error("Config directory not available - could not resolve executable path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The `[discordrich]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiscordRichSettings {
    /// Project-relative directory of the vendor library, used from the editor
    pub lib_path: String,

    /// Enable debug logging
    pub debug: bool,
}

/// Extension configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub discordrich: DiscordRichSettings,
}

impl ExtensionConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `discordrich.toml` next to the executable, defaulting if absent
    pub fn load() -> ConfigResult<Self> {
        let path = config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Read settings from the host project configuration
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let lib_path = source.get_string(LIB_PATH_KEY).unwrap_or_default();
        let debug = source
            .get_string(DEBUG_KEY)
            .map(|v| matches!(v.trim(), "1" | "true"))
            .unwrap_or(false);

        Self {
            discordrich: DiscordRichSettings { lib_path, debug },
        }
    }
}

impl ConfigSource for ExtensionConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        match key {
            LIB_PATH_KEY if !self.discordrich.lib_path.is_empty() => {
                Some(self.discordrich.lib_path.clone())
            }
            DEBUG_KEY => Some(if self.discordrich.debug { "1" } else { "0" }.to_string()),
            _ => None,
        }
    }
}
