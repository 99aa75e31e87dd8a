//! Engine configuration: where mods live and how their files are named.

use std::path::{Path, PathBuf};

use super::provider::SettingsStoreExt;
use super::{ConfigError, ConfigResult, SettingsStore};

/// Settings key holding the ordered enabled-mod list.
pub const ENABLED_MODS_KEY: &str = "localData.settings.modListEnabled";
/// Settings key holding the application's asset directory.
pub const ASSET_DIR_KEY: &str = "localData.assetDir";

/// Scheme prefix of virtual asset URLs.
pub const ASSETS_SCHEME: &str = "assets://";
/// Base URL of the per-mod asset subtrees.
pub const MODS_ASSETS_ROOT: &str = "assets://mods/";

pub const DEFAULT_ENTRY_FILE: &str = "mod.json";
pub const DEFAULT_SINGLE_FILE_EXTENSION: &str = "json";

const MODS_DIR_NAME: &str = "mods";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModsConfig {
    pub mods_dir: PathBuf,
    /// Entry file looked up inside a package mod directory.
    pub entry_file: String,
    /// Extension (without the dot) that marks a single-file mod.
    pub single_file_extension: String,
}

impl ModsConfig {
    pub fn new(mods_dir: impl Into<PathBuf>) -> Self {
        Self {
            mods_dir: mods_dir.into(),
            entry_file: DEFAULT_ENTRY_FILE.to_string(),
            single_file_extension: DEFAULT_SINGLE_FILE_EXTENSION.to_string(),
        }
    }

    /// Derives the mods directory as `<assetDir>/mods` from the settings store.
    pub fn from_settings(settings: &(impl SettingsStore + ?Sized)) -> ConfigResult<Self> {
        let asset_dir: PathBuf =
            settings
                .get::<PathBuf>(ASSET_DIR_KEY)?
                .ok_or_else(|| ConfigError::NotFound {
                    key: ASSET_DIR_KEY.to_string(),
                })?;
        Ok(Self::new(asset_dir.join(MODS_DIR_NAME)))
    }

    pub fn with_entry_file(mut self, entry_file: impl Into<String>) -> Self {
        self.entry_file = entry_file.into();
        self
    }

    pub fn with_single_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.single_file_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn mod_root_dir(&self, id: &str) -> PathBuf {
        self.mods_dir.join(id)
    }

    pub fn package_entry_path(&self, id: &str) -> PathBuf {
        self.mods_dir.join(id).join(&self.entry_file)
    }

    pub fn single_file_path(&self, id: &str) -> PathBuf {
        self.mods_dir.join(id)
    }

    /// Virtual asset base URL of a package mod: `assets://mods/<id>/`.
    pub fn mod_root_url(&self, id: &str) -> String {
        format!("{MODS_ASSETS_ROOT}{id}/")
    }

    pub fn is_single_file_name(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .is_some_and(|ext| ext == self.single_file_extension.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemorySettings;
    use serde_json::json;

    #[test]
    fn test_from_settings() {
        let settings = MemorySettings::new().value(ASSET_DIR_KEY, json!("/games/assets"));
        let config = ModsConfig::from_settings(&settings).unwrap();

        assert_eq!(config.mods_dir, PathBuf::from("/games/assets/mods"));
        assert_eq!(config.entry_file, "mod.json");
        assert_eq!(config.single_file_extension, "json");
    }

    #[test]
    fn test_from_settings_missing_asset_dir() {
        let err = ModsConfig::from_settings(&MemorySettings::new()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { ref key } if key == ASSET_DIR_KEY));
    }

    #[test]
    fn test_paths() {
        let config = ModsConfig::new("/m");

        assert_eq!(config.mod_root_dir("a"), PathBuf::from("/m/a"));
        assert_eq!(config.package_entry_path("a"), PathBuf::from("/m/a/mod.json"));
        assert_eq!(config.single_file_path("b.json"), PathBuf::from("/m/b.json"));
        assert_eq!(config.mod_root_url("a"), "assets://mods/a/");
    }

    #[test]
    fn test_single_file_extension() {
        let config = ModsConfig::new("/m").with_single_file_extension(".mod");

        assert_eq!(config.single_file_extension, "mod");
        assert!(config.is_single_file_name("tweak.mod"));
        assert!(!config.is_single_file_name("tweak.json"));
        assert!(!config.is_single_file_name("tweak"));
    }
}
