use std::path::PathBuf;

use crate::BoxError;
use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ModError {
    /// Nothing exists at the probed location. Recoverable: used for existence probes.
    #[error("Mod not found: {path}")]
    NotFound { id: String, path: PathBuf },

    #[error("Mod '{id}' is missing required file '{entry_file}'")]
    MissingEntryPoint { id: String, entry_file: String },

    /// The mod exists but its own definition failed to load.
    #[error("Failed to load mod '{id}': {source}")]
    LoadFailed {
        id: String,
        #[source]
        source: BoxError,
    },

    #[error("Incorrectly formatted mod '{id}': {reason}")]
    MalformedData { id: String, reason: String },

    #[error("Edit from mod '{id}' failed: {message}")]
    EditFailed { id: String, message: String },

    #[error("Route test failed for {url}: {message}")]
    RouteValidation { url: String, message: String },

    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ModError {
    pub(crate) fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ModError::MalformedData {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ModError::NotFound { .. })
    }

    /// The mod this error is attributed to, when there is one.
    pub fn mod_id(&self) -> Option<&str> {
        match self {
            ModError::NotFound { id, .. }
            | ModError::MissingEntryPoint { id, .. }
            | ModError::LoadFailed { id, .. }
            | ModError::MalformedData { id, .. }
            | ModError::EditFailed { id, .. } => Some(id),
            _ => None,
        }
    }
}
