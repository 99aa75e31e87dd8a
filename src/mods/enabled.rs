//! The ordered enabled-mod list. Index 0 has the highest priority.

use std::collections::HashSet;
use std::sync::Arc;

use super::ModError;
use super::descriptor::ModDescriptor;
use super::loader::ModLoader;
use crate::config::{ENABLED_MODS_KEY, SettingsStore, SettingsStoreExt};

#[derive(Clone)]
pub struct EnabledMods {
    settings: Arc<dyn SettingsStore>,
}

impl EnabledMods {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Enabled ids in priority order. Duplicates keep their first position.
    pub fn ids(&self) -> Result<Vec<String>, ModError> {
        let stored: Vec<String> = if self.settings.has(ENABLED_MODS_KEY)? {
            self.settings.get(ENABLED_MODS_KEY)?.unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut seen = HashSet::with_capacity(stored.len());
        let mut ids = Vec::with_capacity(stored.len());
        for id in stored {
            if seen.insert(id.clone()) {
                ids.push(id);
            } else {
                tracing::warn!(mod_id = %id, "Ignoring duplicate entry in enabled mod list");
            }
        }
        Ok(ids)
    }

    pub fn set(&self, ids: &[String]) -> Result<(), ModError> {
        self.settings.set(ENABLED_MODS_KEY, &ids)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ModError> {
        self.set(&[])?;
        tracing::debug!("Mod list cleared");
        Ok(())
    }

    /// Loads every enabled mod, preserving priority order. Descriptors are
    /// rebuilt on every call.
    pub fn resolve(&self, loader: &ModLoader) -> Result<Vec<ModDescriptor>, ModError> {
        self.ids()?.iter().map(|id| loader.load(id)).collect()
    }
}

impl std::fmt::Debug for EnabledMods {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnabledMods")
            .field("settings", &self.settings.name())
            .finish()
    }
}
