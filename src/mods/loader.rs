//! Resolving a mod id to a [`ModDescriptor`].
//!
//! Resolution is a two-stage state machine. A package (a directory with an
//! entry file) is tried first; only when that is *not found* is the id retried
//! as a single file. A definition that exists but fails to load is never
//! retried, so a broken mod is not reported as a missing one.

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use super::ModError;
use super::descriptor::ModDescriptor;
use super::failure::FailureReporter;
use super::module_loader::{LoadOutcome, ModuleLoader};
use crate::config::ModsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Package,
    /// `fallback` is set when the package stage came up empty.
    SingleFile { fallback: bool },
}

pub struct ModLoader {
    config: Arc<ModsConfig>,
    modules: Arc<dyn ModuleLoader>,
    reporter: Arc<FailureReporter>,
}

impl ModLoader {
    pub fn new(
        config: Arc<ModsConfig>,
        modules: Arc<dyn ModuleLoader>,
        reporter: Arc<FailureReporter>,
    ) -> Self {
        Self {
            config,
            modules,
            reporter,
        }
    }

    pub fn config(&self) -> &ModsConfig {
        &self.config
    }

    /// Loads `id` as a package, falling back to a single file.
    ///
    /// Any failure other than [`ModError::NotFound`] disables all mods through
    /// the failure reporter before it is returned.
    pub fn load(&self, id: &str) -> Result<ModDescriptor, ModError> {
        self.resolve(id, false).inspect_err(|error| {
            if !error.is_not_found() {
                self.reporter.report(&[id.to_string()], error);
            }
        })
    }

    /// Probes for a single-file mod without falling back. A missing file is
    /// returned as [`ModError::NotFound`] and is not reported.
    pub fn load_single_file(&self, id: &str) -> Result<ModDescriptor, ModError> {
        self.resolve(id, true).inspect_err(|error| {
            if !error.is_not_found() {
                self.reporter.report(&[id.to_string()], error);
            }
        })
    }

    /// Runs the resolution state machine without reporting failures.
    pub(crate) fn resolve(&self, id: &str, single_file: bool) -> Result<ModDescriptor, ModError> {
        let mut stage = if single_file {
            Stage::SingleFile { fallback: false }
        } else {
            Stage::Package
        };

        loop {
            let path = self.stage_path(id, stage);
            tracing::trace!(mod_id = id, ?stage, path = %path.display(), "Resolving mod");

            match (stage, self.modules.load(&path)) {
                (Stage::Package, LoadOutcome::Found(definition)) => {
                    let root_url = Url::parse(&self.config.mod_root_url(id)).map_err(|e| {
                        ModError::malformed(id, format!("invalid mod id for asset URL: {e}"))
                    })?;
                    return Ok(ModDescriptor::package(
                        id,
                        self.config.mod_root_dir(id),
                        root_url,
                        definition,
                    ));
                }
                (Stage::SingleFile { .. }, LoadOutcome::Found(definition)) => {
                    return Ok(ModDescriptor::single_file(id, definition));
                }
                (Stage::Package, LoadOutcome::NotFound) => {
                    stage = Stage::SingleFile { fallback: true };
                }
                (Stage::SingleFile { fallback: true }, LoadOutcome::NotFound) => {
                    return Err(ModError::MissingEntryPoint {
                        id: id.to_string(),
                        entry_file: self.config.entry_file.clone(),
                    });
                }
                (Stage::SingleFile { fallback: false }, LoadOutcome::NotFound) => {
                    return Err(ModError::NotFound {
                        id: id.to_string(),
                        path,
                    });
                }
                (_, LoadOutcome::Failed(source)) => {
                    return Err(ModError::LoadFailed {
                        id: id.to_string(),
                        source,
                    });
                }
            }
        }
    }

    fn stage_path(&self, id: &str, stage: Stage) -> PathBuf {
        match stage {
            Stage::Package => self.config.package_entry_path(id),
            Stage::SingleFile { .. } => self.config.single_file_path(id),
        }
    }
}

impl std::fmt::Debug for ModLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModLoader")
            .field("config", &self.config)
            .field("reporter", &self.reporter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENABLED_MODS_KEY, MemorySettings};
    use crate::mods::{EnabledMods, ModDefinition, ProcessRole, StaticModuleLoader};
    use crate::testing::RecordingPresenter;
    use serde_json::json;
    use std::path::Path;

    struct Fixture {
        loader: ModLoader,
        enabled: EnabledMods,
        presenter: Arc<RecordingPresenter>,
    }

    fn fixture(modules: StaticModuleLoader) -> Fixture {
        let settings = MemorySettings::new().value(ENABLED_MODS_KEY, json!(["a", "b"]));
        let enabled = EnabledMods::new(Arc::new(settings));
        let presenter = Arc::new(RecordingPresenter::default());
        let reporter = Arc::new(FailureReporter::new(
            enabled.clone(),
            presenter.clone(),
            ProcessRole::Privileged,
        ));
        let loader = ModLoader::new(
            Arc::new(ModsConfig::new("/mods")),
            Arc::new(modules),
            reporter,
        );
        Fixture {
            loader,
            enabled,
            presenter,
        }
    }

    #[test]
    fn test_load_package() {
        let fx = fixture(
            StaticModuleLoader::new().with_module("/mods/hires/mod.json", ModDefinition::new()),
        );

        let descriptor = fx.loader.load("hires").unwrap();
        assert!(!descriptor.is_single_file());
        assert_eq!(descriptor.root_dir(), Some(Path::new("/mods/hires")));
        assert_eq!(
            descriptor.root_url().map(Url::as_str),
            Some("assets://mods/hires/")
        );
    }

    #[test]
    fn test_falls_back_to_single_file() {
        let fx = fixture(
            StaticModuleLoader::new()
                .with_module("/mods/tweak.json", ModDefinition::new().with_title("Tweak")),
        );

        let descriptor = fx.loader.load("tweak.json").unwrap();
        assert!(descriptor.is_single_file());
        assert_eq!(descriptor.id(), "tweak.json");
        assert!(descriptor.root_dir().is_none());
        assert!(fx.presenter.shown.lock().is_empty());
    }

    #[test]
    fn test_missing_entry_point_disables_everything() {
        let fx = fixture(StaticModuleLoader::new());

        let err = fx.loader.load("ghost").unwrap_err();
        assert!(matches!(
            err,
            ModError::MissingEntryPoint { ref id, ref entry_file }
                if id == "ghost" && entry_file == "mod.json"
        ));
        assert!(fx.enabled.ids().unwrap().is_empty());
        assert_eq!(fx.presenter.shown.lock().len(), 1);
    }

    #[test]
    fn test_broken_package_is_not_masked() {
        let fx = fixture(
            StaticModuleLoader::new()
                .with_broken("/mods/bad/mod.json", "syntax error")
                .with_module("/mods/bad", ModDefinition::new()),
        );

        let err = fx.loader.load("bad").unwrap_err();
        match err {
            ModError::LoadFailed { id, source } => {
                assert_eq!(id, "bad");
                assert_eq!(source.to_string(), "syntax error");
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }
        assert!(fx.enabled.ids().unwrap().is_empty());
    }

    #[test]
    fn test_broken_single_file_is_reported() {
        let fx = fixture(StaticModuleLoader::new().with_broken("/mods/x.json", "boom"));

        assert!(matches!(
            fx.loader.load("x.json"),
            Err(ModError::LoadFailed { .. })
        ));
        assert_eq!(fx.presenter.shown.lock().len(), 1);
    }

    #[test]
    fn test_single_file_probe_not_found_is_silent() {
        let fx = fixture(StaticModuleLoader::new());

        let err = fx.loader.load_single_file("ghost.json").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fx.enabled.ids().unwrap(), vec!["a", "b"]);
        assert!(fx.presenter.shown.lock().is_empty());
    }

    #[test]
    fn test_single_file_probe_skips_package() {
        let fx = fixture(
            StaticModuleLoader::new().with_module("/mods/pkg/mod.json", ModDefinition::new()),
        );

        assert!(fx.loader.load_single_file("pkg").unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolve_does_not_report() {
        let fx = fixture(StaticModuleLoader::new());

        assert!(fx.loader.resolve("ghost", false).is_err());
        assert_eq!(fx.enabled.ids().unwrap(), vec!["a", "b"]);
        assert!(fx.presenter.shown.lock().is_empty());
    }
}
