use std::collections::BTreeMap;
use std::sync::Arc;

use super::RouteTable;
use crate::common::{FileSystem, crawl_tree, flatten_tree};
use crate::config::ASSETS_SCHEME;
use crate::mods::{ModDescriptor, ModError};

/// Bakes enabled mods' trees and manual routes into a [`RouteTable`].
///
/// Mods are applied lowest priority first so higher-priority writes land
/// last. Within one mod, tree routes are written before manual routes. The
/// resulting precedence per URL, lowest to highest:
///
/// ```text
/// last mod trees < last mod routes < ... < first mod trees < first mod routes
/// ```
///
/// A lower-priority mod's manual route therefore loses to a higher-priority
/// mod's tree route for the same URL.
pub struct RouteTableBuilder {
    fs: Arc<dyn FileSystem>,
}

impl RouteTableBuilder {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// `descriptors` are in priority order (index 0 highest); `source` is the
    /// enabled list they were resolved from.
    pub fn build(&self, descriptors: &[ModDescriptor], source: Vec<String>) -> RouteTable {
        tracing::info!(mods = ?source, "Baking routes");

        let mut routes = BTreeMap::new();
        for descriptor in descriptors.iter().rev() {
            match self.contribution(descriptor) {
                Ok(contribution) => {
                    tracing::debug!(
                        mod_id = %descriptor.id(),
                        count = contribution.len(),
                        "Applying mod routes"
                    );
                    routes.extend(contribution);
                }
                Err(e) => {
                    tracing::error!(mod_id = %descriptor.id(), error = %e, "Skipping mod routes");
                }
            }
        }

        RouteTable::new(routes, source)
    }

    /// One mod's routes in write order: tree routes, then manual routes.
    fn contribution(
        &self,
        descriptor: &ModDescriptor,
    ) -> Result<Vec<(String, String)>, ModError> {
        let definition = descriptor.definition();
        let mut out = Vec::new();

        if let Some(trees) = &definition.trees {
            let root_dir = descriptor.root_dir().ok_or_else(|| {
                ModError::malformed(descriptor.id(), "single-file mods cannot use tree routes")
            })?;

            for (local_dir, asset_dir) in trees {
                check_tree_paths(descriptor.id(), local_dir, asset_dir)?;

                let tree = crawl_tree(self.fs.as_ref(), &root_dir.join(local_dir), true)?;
                for relative in flatten_tree(&tree) {
                    let target = descriptor.resolve_url(&format!("{local_dir}{relative}"))?;
                    out.push((format!("{asset_dir}{relative}"), target.to_string()));
                }
            }
        }

        if let Some(manual) = &definition.routes {
            for (asset_url, local) in manual {
                let target = descriptor.resolve_url(local)?;
                out.push((asset_url.clone(), target.to_string()));
            }
        }

        Ok(out)
    }
}

fn check_tree_paths(id: &str, local_dir: &str, asset_dir: &str) -> Result<(), ModError> {
    if !local_dir.ends_with('/') {
        return Err(ModError::malformed(
            id,
            format!("tree path '{local_dir}' must be a directory (end with /)"),
        ));
    }
    if !asset_dir.ends_with('/') {
        return Err(ModError::malformed(
            id,
            format!("tree path '{asset_dir}' must be a directory (end with /)"),
        ));
    }
    if !asset_dir.starts_with(ASSETS_SCHEME) {
        return Err(ModError::malformed(
            id,
            format!("asset path '{asset_dir}' must use the {ASSETS_SCHEME} scheme"),
        ));
    }
    Ok(())
}
