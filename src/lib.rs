//! # mod-overlay
//!
//! Priority-ordered mod overlay engine for a content viewer.
//!
//! Mods are discovered in `<assetDir>/mods/`, enabled through an ordered
//! list in the settings store (index 0 wins), and contribute:
//!
//! - **asset routes**: `assets://` URLs redirected to mod files, either one
//!   by one (`routes`) or by mirroring a directory (`trees`)
//! - **document edits and footnotes** applied to the viewed document
//! - **UI patches** overriding component data and computed values
//! - **stylesheets** injected into the main view
//!
//! Any load failure disables every mod and tells the user to check the logs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mod_overlay::{Document, FileSettings, ModEngine};
//!
//! fn main() -> Result<(), mod_overlay::Error> {
//!     let settings = Arc::new(FileSettings::new("config.json".into()));
//!     let engine = ModEngine::builder(settings).build()?;
//!
//!     if let Some(file) = engine.asset_route("assets://storyfiles/logo.png")? {
//!         println!("served by mod: {file}");
//!     }
//!
//!     let mut document = Document::default();
//!     for failure in engine.edit_document(&mut document)? {
//!         eprintln!("{failure}");
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod common;
pub mod config;
pub mod document;
pub mod engine;
pub mod mods;
pub mod observability;
pub mod prelude;
pub mod routes;
pub mod ui;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use catalog::{
    CatalogChannel, CatalogClient, CatalogError, CatalogRequest, CatalogResponse, CatalogService,
};
pub use common::{DirEntry, FileSystem, OsFileSystem};
pub use config::{
    ConfigError, FileSettings, MemorySettings, ModsConfig, SettingsStore, SettingsStoreExt,
};
pub use document::{
    Attribution, Document, DocumentEdit, DocumentPipeline, EditScript, Footnote, FootnoteGroup,
};
pub use engine::{ModEngine, ModEngineBuilder};
pub use mods::{
    Catalog, CatalogEntry, DiagnosticPresenter, FailureReporter, JsonModuleLoader, LoadOutcome,
    LogPresenter, ModDefinition, ModDescriptor, ModError, ModuleLoader, ProcessRole,
    StaticModuleLoader,
};
pub use routes::{AssetResolver, RouteTable, RouteTableBuilder};
pub use ui::{ComponentInstance, ComponentPatchRule, PatchHook, StaticComponent};

/// Boxed error produced by mod-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for mod-overlay operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Loading or applying a mod failed.
    #[error(transparent)]
    Mod(#[from] ModError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog request across the process boundary failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Expected absence, e.g. probing for a mod that is not installed
    Recoverable,
    /// A mod is missing its entry point, failed to load or is malformed
    Plugin,
    /// Post-bake route testing found an unresolvable route
    Diagnostic,
    /// Settings store or mods configuration errors
    Configuration,
    /// Internal errors (IO, JSON, transport)
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Mod(ModError::NotFound { .. }) => ErrorCategory::Recoverable,

            Error::Mod(
                ModError::MissingEntryPoint { .. }
                | ModError::LoadFailed { .. }
                | ModError::MalformedData { .. }
                | ModError::EditFailed { .. },
            ) => ErrorCategory::Plugin,

            Error::Mod(ModError::RouteValidation { .. }) => ErrorCategory::Diagnostic,

            Error::Config(_) | Error::Mod(ModError::Settings(_)) => ErrorCategory::Configuration,

            Error::Mod(ModError::Io(_) | ModError::Json(_)) | Error::Catalog(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Recoverable
    }

    pub fn is_plugin_error(&self) -> bool {
        self.category() == ErrorCategory::Plugin
    }

    /// The mod this error is attributed to, when there is one.
    pub fn mod_id(&self) -> Option<&str> {
        match self {
            Error::Mod(e) => e.mod_id(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
