//! Serving the mod catalog across the process boundary.
//!
//! The privileged process owns a [`CatalogService`] holding the only cached
//! catalog. The display process creates a [`CatalogClient`], which makes a
//! single blocking request at startup and keeps the answer.
//!
//! Messages serialize as tagged JSON:
//!
//! ```json
//! {"type": "GET_AVAILABLE_MODS"}
//! {"type": "AVAILABLE_MODS", "mods": {"hires": {"label": "Hi-res", "desc": null, "key": "hires"}}}
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::engine::ModEngine;
use crate::mods::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogRequest {
    GetAvailableMods,
    ModsForceReload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogResponse {
    AvailableMods { mods: Catalog },
    Reloaded { ok: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog transport failed: {0}")]
    Transport(String),

    #[error("Unexpected catalog response to {request:?}: {response:?}")]
    UnexpectedResponse {
        request: CatalogRequest,
        response: CatalogResponse,
    },

    #[error("Catalog message encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous request/response channel to the privileged process.
pub trait CatalogChannel: Send + Sync {
    fn request(&self, request: CatalogRequest) -> Result<CatalogResponse, CatalogError>;
}

impl<F> CatalogChannel for F
where
    F: Fn(CatalogRequest) -> Result<CatalogResponse, CatalogError> + Send + Sync,
{
    fn request(&self, request: CatalogRequest) -> Result<CatalogResponse, CatalogError> {
        self(request)
    }
}

/// Privileged-side owner of the catalog cache.
pub struct CatalogService {
    engine: Arc<ModEngine>,
    cache: RwLock<Catalog>,
}

impl CatalogService {
    /// Scans the mods folder once and caches the result.
    pub fn new(engine: Arc<ModEngine>) -> Self {
        let cache = RwLock::new(engine.catalog());
        Self { engine, cache }
    }

    pub fn catalog(&self) -> Catalog {
        self.cache.read().clone()
    }

    /// Rescans the mods folder and replaces the cache.
    pub fn reload(&self) -> Catalog {
        let catalog = self.engine.catalog();
        *self.cache.write() = catalog.clone();
        catalog
    }

    pub fn handle(&self, request: &CatalogRequest) -> CatalogResponse {
        match request {
            CatalogRequest::GetAvailableMods => CatalogResponse::AvailableMods {
                mods: self.catalog(),
            },
            CatalogRequest::ModsForceReload => {
                self.reload();
                CatalogResponse::Reloaded { ok: true }
            }
        }
    }

    /// Handles one JSON-encoded request, returning the encoded response.
    pub fn handle_json(&self, request: &str) -> Result<String, CatalogError> {
        let request: CatalogRequest = serde_json::from_str(request)?;
        Ok(serde_json::to_string(&self.handle(&request))?)
    }
}

impl CatalogChannel for CatalogService {
    fn request(&self, request: CatalogRequest) -> Result<CatalogResponse, CatalogError> {
        Ok(self.handle(&request))
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("mods", &self.cache.read().len())
            .finish()
    }
}

/// Display-side read-through copy of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    catalog: Catalog,
}

impl CatalogClient {
    /// Requests the catalog once.
    pub fn connect(channel: &dyn CatalogChannel) -> Result<Self, CatalogError> {
        tracing::info!("Requesting mod list from privileged process");
        Ok(Self {
            catalog: fetch(channel)?,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Asks the privileged side to rescan, then refreshes the local copy.
    pub fn force_reload(&mut self, channel: &dyn CatalogChannel) -> Result<(), CatalogError> {
        let request = CatalogRequest::ModsForceReload;
        match channel.request(request.clone())? {
            CatalogResponse::Reloaded { ok: true } => {}
            response => return Err(CatalogError::UnexpectedResponse { request, response }),
        }
        self.catalog = fetch(channel)?;
        Ok(())
    }
}

fn fetch(channel: &dyn CatalogChannel) -> Result<Catalog, CatalogError> {
    let request = CatalogRequest::GetAvailableMods;
    match channel.request(request.clone())? {
        CatalogResponse::AvailableMods { mods } => Ok(mods),
        response => Err(CatalogError::UnexpectedResponse { request, response }),
    }
}
