use super::RouteTable;
use crate::BoxError;
use crate::mods::ModError;

/// The host's asset-resolution subsystem, consulted after a bake.
pub trait AssetResolver: Send + Sync {
    fn is_ready(&self) -> bool;
    fn resolve_url(&self, url: &str) -> Result<String, BoxError>;
}

/// Resolves every baked URL, returning one error per failure. Does nothing
/// until the resolver reports ready.
pub fn validate_routes(table: &RouteTable, resolver: &dyn AssetResolver) -> Vec<ModError> {
    if !resolver.is_ready() {
        tracing::trace!("Asset resolver not ready; skipping route tests");
        return Vec::new();
    }

    table
        .urls()
        .filter_map(|url| match resolver.resolve_url(url) {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(url, error = %e, "Testing routes failed");
                Some(ModError::RouteValidation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        })
        .collect()
}
