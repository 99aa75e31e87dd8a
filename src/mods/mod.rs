//! Mod discovery, loading and the enabled-mod list.
//!
//! Mods live in `<assetDir>/mods/` as either a package directory holding a
//! `mod.json` entry file, or a single `.json` file:
//!
//! ```text
//! <assetDir>/mods/
//! ├── hires-sprites/
//! │   ├── mod.json
//! │   ├── footnotes.json
//! │   └── gfx/
//! │       └── logo.png
//! └── typo-fixes.json
//! ```
//!
//! Package mods resolve relative paths against their directory and are
//! served under `assets://mods/<id>/`. Single-file mods have no root and may
//! only reference absolute asset URLs.

mod definition;
mod descriptor;
mod discovery;
mod enabled;
mod error;
mod failure;
mod loader;
mod module_loader;

pub use definition::{FootnoteSource, ModDefinition};
pub use descriptor::{ModDescriptor, ModOrigin};
pub use discovery::{Catalog, CatalogEntry, ModDiscovery};
pub use enabled::EnabledMods;
pub use error::ModError;
pub use failure::{
    DiagnosticPresenter, FAILURE_MESSAGE, FAILURE_TITLE, FailureReporter, LogPresenter,
    ProcessRole,
};
pub use loader::ModLoader;
pub use module_loader::{JsonModuleLoader, LoadOutcome, ModuleLoader, StaticModuleLoader};
