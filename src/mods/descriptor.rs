//! Loaded mods and their provenance.

use std::path::{Path, PathBuf};

use url::Url;

use super::ModError;
use super::definition::ModDefinition;

/// How a mod was found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModOrigin {
    /// A directory holding an entry file; relative paths resolve against it.
    Package { root_dir: PathBuf, root_url: Url },
    /// A standalone file with no root to resolve relative paths against.
    SingleFile,
}

/// A loaded mod: its definition stamped with provenance.
#[derive(Debug, Clone)]
pub struct ModDescriptor {
    pub(crate) id: String,
    pub(crate) origin: ModOrigin,
    pub(crate) definition: ModDefinition,
}

impl ModDescriptor {
    pub fn package(
        id: impl Into<String>,
        root_dir: PathBuf,
        root_url: Url,
        definition: ModDefinition,
    ) -> Self {
        Self {
            id: id.into(),
            origin: ModOrigin::Package { root_dir, root_url },
            definition,
        }
    }

    pub fn single_file(id: impl Into<String>, definition: ModDefinition) -> Self {
        Self {
            id: id.into(),
            origin: ModOrigin::SingleFile,
            definition,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &ModOrigin {
        &self.origin
    }

    pub fn is_single_file(&self) -> bool {
        matches!(self.origin, ModOrigin::SingleFile)
    }

    pub fn root_dir(&self) -> Option<&Path> {
        match &self.origin {
            ModOrigin::Package { root_dir, .. } => Some(root_dir),
            ModOrigin::SingleFile => None,
        }
    }

    pub fn root_url(&self) -> Option<&Url> {
        match &self.origin {
            ModOrigin::Package { root_url, .. } => Some(root_url),
            ModOrigin::SingleFile => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.definition.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    /// Title for log lines, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.title().unwrap_or(&self.id)
    }

    pub fn definition(&self) -> &ModDefinition {
        &self.definition
    }

    /// Resolves a reference against the mod's root URL. Single-file mods have
    /// no root, so only absolute URLs resolve.
    pub fn resolve_url(&self, reference: &str) -> Result<Url, ModError> {
        let resolved = match &self.origin {
            ModOrigin::Package { root_url, .. } => root_url.join(reference),
            ModOrigin::SingleFile => Url::parse(reference),
        };
        resolved.map_err(|e| {
            let reason = if self.is_single_file() {
                format!("single-file mods cannot use local path '{reference}': {e}")
            } else {
                format!("cannot resolve '{reference}': {e}")
            };
            ModError::malformed(&self.id, reason)
        })
    }

    /// Resolves a mod-relative filesystem path.
    pub fn resolve_path(&self, relative: &str) -> Result<PathBuf, ModError> {
        self.root_dir()
            .map(|root| root.join(relative))
            .ok_or_else(|| {
                ModError::malformed(
                    &self.id,
                    format!("single-file mods cannot use local file '{relative}'"),
                )
            })
    }
}
