//! File-based Settings Store
//!
//! Loads settings from a JSON file. Keys use dot notation to address nested
//! objects, so `localData.settings.modListEnabled` reads
//! `{"localData": {"settings": {"modListEnabled": [...]}}}`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::ConfigResult;
use super::provider::SettingsStore;

/// File-based settings store
pub struct FileSettings {
    /// Path to the settings file
    path: PathBuf,
    /// Cached data
    data: Arc<RwLock<Option<Map<String, Value>>>>,
    /// Whether to re-read the file on every access
    auto_reload: bool,
}

impl FileSettings {
    /// Create a new file store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: Arc::new(RwLock::new(None)),
            auto_reload: false,
        }
    }

    /// Create a file store with auto-reload enabled
    pub fn auto_reload(path: PathBuf) -> Self {
        Self {
            path,
            data: Arc::new(RwLock::new(None)),
            auto_reload: true,
        }
    }

    fn load(&self) -> ConfigResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let data: Map<String, Value> = serde_json::from_str(&content)?;
        Ok(data)
    }

    fn ensure_loaded(&self) -> ConfigResult<()> {
        let mut data = self.data.write();
        if data.is_none() || self.auto_reload {
            *data = Some(self.load()?);
        }
        Ok(())
    }

    fn save(&self, data: &Map<String, Value>) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Reload settings from file
    pub fn reload(&self) -> ConfigResult<()> {
        let mut data = self.data.write();
        *data = Some(self.load()?);
        Ok(())
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn insert(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert(child, rest, value);
            }
        }
    }
}

fn remove(map: &mut Map<String, Value>, key: &str) -> bool {
    match key.split_once('.') {
        None => map.remove(key).is_some(),
        Some((head, rest)) => match map.get_mut(head) {
            Some(Value::Object(child)) => remove(child, rest),
            _ => false,
        },
    }
}

impl SettingsStore for FileSettings {
    fn name(&self) -> &str {
        "file"
    }

    fn get_raw(&self, key: &str) -> ConfigResult<Option<Value>> {
        self.ensure_loaded()?;

        let data = self.data.read();
        Ok(data.as_ref().and_then(|map| lookup(map, key)).cloned())
    }

    fn set_raw(&self, key: &str, value: Value) -> ConfigResult<()> {
        self.ensure_loaded()?;

        let mut data = self.data.write();
        let map = data.get_or_insert_with(Map::new);
        insert(map, key, value);
        self.save(map)
    }

    fn delete(&self, key: &str) -> ConfigResult<bool> {
        self.ensure_loaded()?;

        let mut data = self.data.write();
        match data.as_mut() {
            Some(map) => {
                let existed = remove(map, key);
                if existed {
                    self.save(map)?;
                }
                Ok(existed)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for FileSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSettings")
            .field("path", &self.path)
            .field("auto_reload", &self.auto_reload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_file_settings_nested_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let config = json!({
            "localData": {
                "assetDir": "/games/assets",
                "settings": { "modListEnabled": ["a", "b"] }
            }
        });
        std::fs::write(&path, config.to_string()).unwrap();

        let store = FileSettings::new(path);

        assert_eq!(
            store.get_raw("localData.assetDir").unwrap(),
            Some(json!("/games/assets"))
        );
        assert_eq!(
            store.get_raw("localData.settings.modListEnabled").unwrap(),
            Some(json!(["a", "b"]))
        );
        assert_eq!(store.get_raw("localData.missing").unwrap(), None);
    }

    #[test]
    fn test_file_settings_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSettings::new(temp_dir.path().join("nonexistent.json"));

        assert_eq!(store.get_raw("key").unwrap(), None);
    }

    #[test]
    fn test_file_settings_nested_write_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let store = FileSettings::new(path.clone());
        store
            .set_raw("localData.settings.modListEnabled", json!(["x"]))
            .unwrap();
        store.set_raw("localData.assetDir", json!("/a")).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["localData"]["settings"]["modListEnabled"], json!(["x"]));
        assert_eq!(written["localData"]["assetDir"], json!("/a"));
    }

    #[test]
    fn test_file_settings_write_replaces_scalar_parent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSettings::new(temp_dir.path().join("config.json"));

        store.set_raw("a", json!(1)).unwrap();
        store.set_raw("a.b", json!(2)).unwrap();
        assert_eq!(store.get_raw("a").unwrap(), Some(json!({"b": 2})));
    }

    #[test]
    fn test_file_settings_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSettings::new(temp_dir.path().join("config.json"));

        store.set_raw("outer.inner", json!("v")).unwrap();
        assert!(store.delete("outer.inner").unwrap());
        assert!(!store.delete("outer.inner").unwrap());
        assert_eq!(store.get_raw("outer.inner").unwrap(), None);
    }

    #[test]
    fn test_file_settings_auto_reload_sees_external_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"k": 1}"#).unwrap();

        let cached = FileSettings::new(path.clone());
        let live = FileSettings::auto_reload(path.clone());
        assert_eq!(cached.get_raw("k").unwrap(), Some(json!(1)));
        assert_eq!(live.get_raw("k").unwrap(), Some(json!(1)));

        std::fs::write(&path, r#"{"k": 2}"#).unwrap();
        assert_eq!(cached.get_raw("k").unwrap(), Some(json!(1)));
        assert_eq!(live.get_raw("k").unwrap(), Some(json!(2)));

        cached.reload().unwrap();
        assert_eq!(cached.get_raw("k").unwrap(), Some(json!(2)));
    }
}
