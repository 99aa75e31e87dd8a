//! Engine construction.

use std::sync::Arc;

use parking_lot::RwLock;

use super::ModEngine;
use crate::Result;
use crate::common::{FileSystem, OsFileSystem};
use crate::config::{ModsConfig, SettingsStore};
use crate::document::DocumentPipeline;
use crate::mods::{
    DiagnosticPresenter, EnabledMods, FailureReporter, JsonModuleLoader, LogPresenter, ModLoader,
    ModuleLoader, ProcessRole,
};
use crate::routes::{AssetResolver, RouteTableBuilder};

/// Builder for [`ModEngine`].
pub struct ModEngineBuilder {
    settings: Arc<dyn SettingsStore>,
    config: Option<ModsConfig>,
    fs: Option<Arc<dyn FileSystem>>,
    module_loader: Option<Arc<dyn ModuleLoader>>,
    presenter: Option<Arc<dyn DiagnosticPresenter>>,
    role: ProcessRole,
    asset_resolver: Option<Arc<dyn AssetResolver>>,
}

impl ModEngineBuilder {
    pub(super) fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            config: None,
            fs: None,
            module_loader: None,
            presenter: None,
            role: ProcessRole::default(),
            asset_resolver: None,
        }
    }

    /// Set the mods configuration. Defaults to `<assetDir>/mods` read from
    /// the settings store.
    pub fn config(mut self, config: ModsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the filesystem. Defaults to [`OsFileSystem`].
    pub fn filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Set the module loader. Defaults to a [`JsonModuleLoader`] over the
    /// engine's filesystem.
    pub fn module_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.module_loader = Some(loader);
        self
    }

    /// Set the dialog presenter used when mods fail. Defaults to
    /// [`LogPresenter`].
    pub fn presenter(mut self, presenter: Arc<dyn DiagnosticPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn role(mut self, role: ProcessRole) -> Self {
        self.role = role;
        self
    }

    /// Set the resolver used to test routes after each bake.
    pub fn asset_resolver(mut self, resolver: Arc<dyn AssetResolver>) -> Self {
        self.asset_resolver = Some(resolver);
        self
    }

    pub fn build(self) -> Result<ModEngine> {
        let config = match self.config {
            Some(config) => config,
            None => ModsConfig::from_settings(self.settings.as_ref())?,
        };
        let config = Arc::new(config);
        let fs = self.fs.unwrap_or_else(|| Arc::new(OsFileSystem));
        let modules = self
            .module_loader
            .unwrap_or_else(|| Arc::new(JsonModuleLoader::new(fs.clone())));
        let presenter = self.presenter.unwrap_or_else(|| Arc::new(LogPresenter));

        let enabled = EnabledMods::new(self.settings);
        let reporter = Arc::new(FailureReporter::new(enabled.clone(), presenter, self.role));
        let loader = ModLoader::new(config.clone(), modules, reporter.clone());

        tracing::debug!(
            mods_dir = %config.mods_dir.display(),
            role = ?self.role,
            "Mod engine ready"
        );

        Ok(ModEngine {
            routes_builder: RouteTableBuilder::new(fs.clone()),
            pipeline: DocumentPipeline::new(fs.clone()),
            fs,
            config,
            enabled,
            loader,
            reporter,
            asset_resolver: self.asset_resolver,
            routes: RwLock::new(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::{ASSET_DIR_KEY, ConfigError, MemorySettings};
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_config_from_settings() {
        let settings = MemorySettings::new().value(ASSET_DIR_KEY, json!("/game/assets"));
        let engine = ModEngine::builder(Arc::new(settings)).build().unwrap();

        assert_eq!(engine.config().mods_dir, PathBuf::from("/game/assets/mods"));
        assert_eq!(engine.role(), ProcessRole::Privileged);
    }

    #[test]
    fn test_missing_asset_dir() {
        let result = ModEngine::builder(Arc::new(MemorySettings::new())).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_explicit_config() {
        let engine = ModEngine::builder(Arc::new(MemorySettings::new()))
            .config(ModsConfig::new("/custom/mods"))
            .role(ProcessRole::Display)
            .build()
            .unwrap();

        assert_eq!(engine.config().mods_dir, PathBuf::from("/custom/mods"));
        assert_eq!(engine.role(), ProcessRole::Display);
    }
}
