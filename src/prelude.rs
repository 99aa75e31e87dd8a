//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use mod_overlay::prelude::*;
//! ```

// Core types
pub use crate::Error;
pub use crate::Result;
pub use crate::{ModEngine, ModEngineBuilder};

// Settings
pub use crate::config::{FileSettings, MemorySettings, ModsConfig, SettingsStore, SettingsStoreExt};

// Mods
pub use crate::mods::{
    DiagnosticPresenter, ModDefinition, ModDescriptor, ModError, ModuleLoader, ProcessRole,
};

// Contributions
pub use crate::document::{Document, DocumentEdit};
pub use crate::routes::{AssetResolver, RouteTable};
pub use crate::ui::{ComponentInstance, PatchHook};

// Catalog
pub use crate::catalog::{CatalogChannel, CatalogClient, CatalogService};
