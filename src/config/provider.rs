//! Settings Store Trait

use serde::{Serialize, de::DeserializeOwned};

use super::ConfigResult;

/// Core settings store trait.
///
/// Values are JSON documents; keys are opaque to the engine.
pub trait SettingsStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &str;

    /// Get a raw settings value
    fn get_raw(&self, key: &str) -> ConfigResult<Option<serde_json::Value>>;

    /// Set a raw settings value
    fn set_raw(&self, key: &str, value: serde_json::Value) -> ConfigResult<()>;

    /// Delete a settings value
    fn delete(&self, key: &str) -> ConfigResult<bool>;

    /// Check whether a key holds a value
    fn has(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.get_raw(key)?.is_some())
    }
}

/// Extension methods for typed settings access
pub trait SettingsStoreExt: SettingsStore {
    /// Get a typed settings value
    fn get<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => {
                let value: T =
                    serde_json::from_value(raw).map_err(|e| super::ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed settings value
    fn set<T: Serialize>(&self, key: &str, value: &T) -> ConfigResult<()> {
        let raw = serde_json::to_value(value)?;
        self.set_raw(key, raw)
    }
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {}
