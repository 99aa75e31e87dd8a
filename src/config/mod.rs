//! Settings storage and engine configuration.
//!
//! The enabled-mod list and the asset directory live in an external settings
//! store. This module defines the narrow `has/get/set` seam the engine relies on
//! and two stores for it:
//!
//! ```rust,no_run
//! use mod_overlay::config::{FileSettings, ModsConfig, SettingsStoreExt};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = FileSettings::new("config.json".into());
//! let enabled: Option<Vec<String>> = settings.get("localData.settings.modListEnabled")?;
//! let config = ModsConfig::from_settings(&settings)?;
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;
pub mod mods;
pub mod provider;

pub use file::FileSettings;
pub use memory::MemorySettings;
pub use mods::{
    ASSET_DIR_KEY, ASSETS_SCHEME, DEFAULT_ENTRY_FILE, DEFAULT_SINGLE_FILE_EXTENSION,
    ENABLED_MODS_KEY, MODS_ASSETS_ROOT, ModsConfig,
};
pub use provider::{SettingsStore, SettingsStoreExt};

use thiserror::Error;

/// Settings store failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Setting '{key}' is not set")]
    NotFound { key: String },

    /// The stored value does not have the expected shape.
    #[error("Setting '{key}' has an invalid value: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Settings are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Settings file unavailable: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
