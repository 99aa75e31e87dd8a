//! Turning a path into a mod definition.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::definition::ModDefinition;
use crate::BoxError;
use crate::common::FileSystem;

/// Result of asking a [`ModuleLoader`] for a definition.
#[derive(Debug)]
pub enum LoadOutcome {
    Found(ModDefinition),
    /// Nothing loadable exists at the path.
    NotFound,
    /// Something exists but failed to load.
    Failed(BoxError),
}

pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> LoadOutcome;
}

/// Loads mod definitions from JSON files.
///
/// A path that is missing, is a directory, or sits below a regular file is
/// reported as [`LoadOutcome::NotFound`].
pub struct JsonModuleLoader {
    fs: Arc<dyn FileSystem>,
}

impl JsonModuleLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ModuleLoader for JsonModuleLoader {
    fn load(&self, path: &Path) -> LoadOutcome {
        let content = match self.fs.read_to_string(path) {
            Ok(content) => content,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound
                        | io::ErrorKind::IsADirectory
                        | io::ErrorKind::NotADirectory
                ) =>
            {
                return LoadOutcome::NotFound;
            }
            Err(e) => return LoadOutcome::Failed(e.into()),
        };

        match serde_json::from_str::<ModDefinition>(&content) {
            Ok(definition) => LoadOutcome::Found(definition),
            Err(e) => LoadOutcome::Failed(e.into()),
        }
    }
}

/// In-memory registry of definitions keyed by path, for mods compiled into
/// the host (they can carry native edit functions and predicates).
#[derive(Debug, Default)]
pub struct StaticModuleLoader {
    modules: HashMap<PathBuf, Result<ModDefinition, String>>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, path: impl Into<PathBuf>, definition: ModDefinition) -> Self {
        self.register(path, definition);
        self
    }

    /// Registers a path whose definition fails to load with `message`.
    pub fn with_broken(mut self, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.modules.insert(path.into(), Err(message.into()));
        self
    }

    pub fn register(&mut self, path: impl Into<PathBuf>, definition: ModDefinition) {
        self.modules.insert(path.into(), Ok(definition));
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn load(&self, path: &Path) -> LoadOutcome {
        match self.modules.get(path) {
            Some(Ok(definition)) => LoadOutcome::Found(definition.clone()),
            Some(Err(message)) => LoadOutcome::Failed(message.clone().into()),
            None => LoadOutcome::NotFound,
        }
    }
}
