//! Settings held in memory, for tests and for hosts that persist the
//! enabled-mod list themselves.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::ConfigResult;
use super::provider::SettingsStore;

/// Clones share the same map, so a host can keep a handle and observe the
/// engine clearing the enabled list.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    data: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` during construction.
    pub fn value(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.write().insert(key.into(), value.into());
        self
    }

    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.data.read().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_raw(&self, key: &str) -> ConfigResult<Option<Value>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: Value) -> ConfigResult<()> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.data.write().remove(key).is_some())
    }
}
