//! Enumerating the mods folder into a selectable catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::loader::ModLoader;
use crate::common::{FileSystem, TreeNode, crawl_tree};
use crate::config::ModsConfig;

/// Display entry for the mod selection UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub key: String,
}

/// Catalog entries keyed by mod id.
pub type Catalog = BTreeMap<String, CatalogEntry>;

pub struct ModDiscovery;

impl ModDiscovery {
    /// Lists candidate mod ids: directories, and files carrying the
    /// single-file extension. A missing mods folder yields no candidates.
    pub fn candidates(fs: &dyn FileSystem, config: &ModsConfig) -> Vec<String> {
        let tree = match crawl_tree(fs, &config.mods_dir, false) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::error!(
                    mods_dir = %config.mods_dir.display(),
                    error = %e,
                    "Could not read mods directory"
                );
                return Vec::new();
            }
        };

        tree.into_iter()
            .filter_map(|(name, node)| match node {
                TreeNode::Dir(_) => Some(name),
                TreeNode::File if config.is_single_file_name(&name) => Some(name),
                TreeNode::File => {
                    tracing::warn!(name = %name, "Not a mod");
                    None
                }
            })
            .collect()
    }

    /// Builds the catalog. Candidates that fail to load are logged and
    /// omitted; failures here never disable the enabled set.
    pub fn catalog(fs: &dyn FileSystem, loader: &ModLoader) -> Catalog {
        let mut catalog = Catalog::new();

        for id in Self::candidates(fs, loader.config()) {
            match loader.resolve(&id, false) {
                Ok(descriptor) => {
                    catalog.insert(
                        id.clone(),
                        CatalogEntry {
                            label: descriptor.title().map(str::to_string),
                            description: descriptor.description().map(str::to_string),
                            key: id,
                        },
                    );
                }
                Err(e) => tracing::error!(mod_id = %id, error = %e, "Skipping mod in catalog"),
            }
        }

        tracing::info!(count = catalog.len(), "Mod choices loaded");
        tracing::debug!(ids = ?catalog.keys().collect::<Vec<_>>(), "Catalog ids");
        catalog
    }
}
