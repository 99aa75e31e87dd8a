//! The process-wide mod engine.
//!
//! [`ModEngine`] owns the collaborators and the cached route table, and
//! sequences the pure building blocks in [`crate::mods`], [`crate::routes`],
//! [`crate::document`] and [`crate::ui`]. Every operation re-reads the
//! enabled list from settings and reloads the mods it names.

mod builder;

use std::sync::Arc;

use parking_lot::RwLock;

pub use builder::ModEngineBuilder;

use crate::common::FileSystem;
use crate::config::{ASSETS_SCHEME, ModsConfig, SettingsStore};
use crate::document::{Document, DocumentPipeline};
use crate::mods::{
    Catalog, EnabledMods, FailureReporter, ModDescriptor, ModDiscovery, ModError, ModLoader,
    ProcessRole,
};
use crate::routes::{AssetResolver, RouteTable, RouteTableBuilder, validate_routes};
use crate::ui::{PatchHook, collect_stylesheets, compose_patches};

pub struct ModEngine {
    fs: Arc<dyn FileSystem>,
    config: Arc<ModsConfig>,
    enabled: EnabledMods,
    loader: ModLoader,
    reporter: Arc<FailureReporter>,
    asset_resolver: Option<Arc<dyn AssetResolver>>,
    routes_builder: RouteTableBuilder,
    pipeline: DocumentPipeline,
    routes: RwLock<Option<Arc<RouteTable>>>,
}

impl ModEngine {
    pub fn builder(settings: Arc<dyn SettingsStore>) -> ModEngineBuilder {
        ModEngineBuilder::new(settings)
    }

    pub fn config(&self) -> &ModsConfig {
        &self.config
    }

    pub fn role(&self) -> ProcessRole {
        self.reporter.role()
    }

    pub fn enabled_mod_ids(&self) -> Result<Vec<String>, ModError> {
        self.enabled.ids()
    }

    /// Replaces the enabled list. The route table re-bakes on next lookup.
    pub fn set_enabled_mods(&self, ids: &[String]) -> Result<(), ModError> {
        self.enabled.set(ids)?;
        self.invalidate_routes();
        Ok(())
    }

    pub fn clear_enabled_mods(&self) -> Result<(), ModError> {
        self.enabled.clear()?;
        self.invalidate_routes();
        Ok(())
    }

    /// Loads every enabled mod in priority order. A load failure disables
    /// all mods before it is returned.
    pub fn enabled_descriptors(&self) -> Result<Vec<ModDescriptor>, ModError> {
        self.enabled.resolve(&self.loader)
    }

    pub fn load_mod(&self, id: &str) -> Result<ModDescriptor, ModError> {
        self.loader.load(id)
    }

    /// Whether a single-file mod named `id` exists and loads.
    pub fn probe_single_file(&self, id: &str) -> Result<Option<ModDescriptor>, ModError> {
        match self.loader.load_single_file(id) {
            Ok(descriptor) => Ok(Some(descriptor)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Rebuilds the route table from the current enabled list.
    ///
    /// When an asset resolver is ready, every route is tested afterwards. A
    /// failing route disables all mods. The privileged process then rebuilds
    /// the table empty; the display process returns the first failure.
    pub fn bake_routes(&self) -> Result<Arc<RouteTable>, ModError> {
        let ids = self.enabled.ids()?;
        let descriptors = ids
            .iter()
            .map(|id| self.loader.load(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut table = self.routes_builder.build(&descriptors, ids);

        if let Some(resolver) = &self.asset_resolver {
            let mut failures = validate_routes(&table, resolver.as_ref());
            if !failures.is_empty() {
                let urls: Vec<String> = failures
                    .iter()
                    .filter_map(|e| match e {
                        ModError::RouteValidation { url, .. } => Some(url.clone()),
                        _ => None,
                    })
                    .collect();
                let first = failures.swap_remove(0);
                self.reporter.report(&urls, &first);

                if self.reporter.role() == ProcessRole::Display {
                    self.invalidate_routes();
                    return Err(first);
                }
                table = self.routes_builder.build(&[], self.enabled.ids()?);
            }
        }

        let table = Arc::new(table);
        *self.routes.write() = Some(table.clone());
        tracing::info!(count = table.len(), "Routes baked");
        Ok(table)
    }

    /// The current route table, re-baked if the enabled list changed since
    /// it was built.
    pub fn routes(&self) -> Result<Arc<RouteTable>, ModError> {
        let ids = self.enabled.ids()?;
        if let Some(table) = self.routes.read().as_ref()
            && table.is_baked_from(&ids)
        {
            return Ok(table.clone());
        }
        self.bake_routes()
    }

    /// The mod file serving `url`, if any mod overrides it.
    ///
    /// # Panics
    ///
    /// Panics if `url` is not an `assets://` URL.
    pub fn asset_route(&self, url: &str) -> Result<Option<String>, ModError> {
        assert!(
            url.starts_with(ASSETS_SCHEME),
            "asset route lookup for non-asset URL: {url}"
        );

        let table = self.routes()?;
        let route = table.get(url).map(str::to_string);
        if let Some(file) = &route {
            tracing::debug!(url, file = %file, "Asset route");
        }
        Ok(route)
    }

    /// Applies every enabled mod's edit and footnotes to `document`.
    ///
    /// Individual mod failures are isolated and returned; only failing to
    /// load the enabled set is an error.
    pub fn edit_document(&self, document: &mut Document) -> Result<Vec<ModError>, ModError> {
        let descriptors = self.enabled_descriptors()?;
        Ok(self.pipeline.apply_edits(document, &descriptors))
    }

    pub fn compose_patches(&self) -> Result<Vec<PatchHook>, ModError> {
        Ok(compose_patches(&self.enabled_descriptors()?))
    }

    pub fn stylesheets(&self) -> Result<Vec<String>, ModError> {
        Ok(collect_stylesheets(&self.enabled_descriptors()?))
    }

    /// Scans the mods folder. Never disables mods.
    pub fn catalog(&self) -> Catalog {
        ModDiscovery::catalog(self.fs.as_ref(), &self.loader)
    }

    fn invalidate_routes(&self) {
        *self.routes.write() = None;
    }
}

impl std::fmt::Debug for ModEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModEngine")
            .field("config", &self.config)
            .field("enabled", &self.enabled)
            .field("role", &self.role())
            .field("has_asset_resolver", &self.asset_resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxError;
    use crate::config::{ENABLED_MODS_KEY, MemorySettings};
    use crate::testing::RecordingPresenter;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    struct Fixture {
        temp: tempfile::TempDir,
        engine: ModEngine,
        presenter: Arc<RecordingPresenter>,
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture(enabled: &[&str], resolver: Option<Arc<dyn AssetResolver>>) -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a/mod.json", r#"{"routes": {"assets://x": "x.png"}}"#);
        write(temp.path(), "b/mod.json", r#"{"trees": {"gfx/": "assets://"}}"#);
        write(temp.path(), "b/gfx/x.png", "b");
        write(temp.path(), "b/gfx/y.png", "b");

        let settings = MemorySettings::new().value(ENABLED_MODS_KEY, json!(enabled));
        let presenter = Arc::new(RecordingPresenter::default());
        let mut builder = ModEngine::builder(Arc::new(settings))
            .config(ModsConfig::new(temp.path()))
            .presenter(presenter.clone());
        if let Some(resolver) = resolver {
            builder = builder.asset_resolver(resolver);
        }

        Fixture {
            engine: builder.build().unwrap(),
            temp,
            presenter,
        }
    }

    struct RejectAll;

    impl AssetResolver for RejectAll {
        fn is_ready(&self) -> bool {
            true
        }

        fn resolve_url(&self, url: &str) -> Result<String, BoxError> {
            Err(format!("cannot resolve {url}").into())
        }
    }

    #[test]
    fn test_lazy_bake_on_first_lookup() {
        let fx = fixture(&["a", "b"], None);

        assert!(fx.engine.routes.read().is_none());
        assert_eq!(
            fx.engine.asset_route("assets://y.png").unwrap().as_deref(),
            Some("assets://mods/b/gfx/y.png")
        );
        assert!(fx.engine.routes.read().is_some());
    }

    #[test]
    fn test_rebakes_when_enabled_list_changes() {
        let fx = fixture(&["a"], None);
        assert_eq!(fx.engine.asset_route("assets://y.png").unwrap(), None);

        fx.engine
            .set_enabled_mods(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert!(fx.engine.asset_route("assets://y.png").unwrap().is_some());

        fx.engine.clear_enabled_mods().unwrap();
        assert!(fx.engine.routes().unwrap().is_empty());
    }

    #[test]
    fn test_load_failure_disables_and_next_bake_is_empty() {
        let fx = fixture(&["a", "ghost"], None);

        let err = fx.engine.bake_routes().unwrap_err();
        assert!(matches!(err, ModError::MissingEntryPoint { .. }));
        assert!(fx.engine.enabled_mod_ids().unwrap().is_empty());
        assert_eq!(fx.presenter.shown.lock().len(), 1);

        assert!(fx.engine.bake_routes().unwrap().is_empty());
    }

    #[test]
    fn test_route_validation_failure_disables_everything() {
        let fx = fixture(&["a"], Some(Arc::new(RejectAll)));

        let table = fx.engine.bake_routes().unwrap();

        assert!(table.is_empty());
        assert!(fx.engine.enabled_mod_ids().unwrap().is_empty());
        assert_eq!(fx.presenter.shown.lock().len(), 1);
    }

    #[test]
    fn test_route_validation_failure_raises_in_display_process() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a/mod.json", r#"{"routes": {"assets://x": "x.png"}}"#);

        let settings = MemorySettings::new().value(ENABLED_MODS_KEY, json!(["a"]));
        let presenter = Arc::new(RecordingPresenter::default());
        let engine = ModEngine::builder(Arc::new(settings))
            .config(ModsConfig::new(temp.path()))
            .presenter(presenter.clone())
            .role(ProcessRole::Display)
            .asset_resolver(Arc::new(RejectAll))
            .build()
            .unwrap();

        let err = engine.bake_routes().unwrap_err();
        assert!(matches!(err, ModError::RouteValidation { ref url, .. } if url == "assets://x"));
        assert!(engine.enabled_mod_ids().unwrap().is_empty());
        assert!(presenter.shown.lock().is_empty());
        assert!(engine.routes.read().is_none());

        assert!(engine.routes().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "non-asset URL")]
    fn test_asset_route_requires_scheme() {
        let fx = fixture(&[], None);
        let _ = fx.engine.asset_route("https://example.com/x.png");
    }

    #[test]
    fn test_probe_single_file() {
        let fx = fixture(&[], None);
        write(fx.temp.path(), "tweak.json", r#"{"title": "Tweak"}"#);

        assert!(fx.engine.probe_single_file("tweak.json").unwrap().is_some());
        assert!(fx.engine.probe_single_file("ghost.json").unwrap().is_none());
        assert!(fx.presenter.shown.lock().is_empty());
    }

    #[test]
    fn test_catalog_does_not_disable() {
        let fx = fixture(&["a"], None);
        write(fx.temp.path(), "broken.json", "{");

        let catalog = fx.engine.catalog();
        assert!(catalog.contains_key("a"));
        assert!(catalog.contains_key("b"));
        assert!(!catalog.contains_key("broken.json"));
        assert_eq!(fx.engine.enabled_mod_ids().unwrap(), vec!["a"]);
    }
}
