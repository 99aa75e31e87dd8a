//! Applying enabled mods to a document: edits first, then footnotes.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::footnotes::{FootnoteGroup, merge_footnotes, parse_footnote_groups};
use super::model::Document;
use crate::common::FileSystem;
use crate::mods::{FootnoteSource, ModDescriptor, ModError};

pub struct DocumentPipeline {
    fs: Arc<dyn FileSystem>,
}

impl DocumentPipeline {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Runs every mod's edit (lowest priority first), then rebuilds the
    /// footnote table from every mod's contribution in the same order.
    ///
    /// A failing mod is logged and skipped; the others still apply. The
    /// skipped failures are returned.
    pub fn apply_edits(
        &self,
        document: &mut Document,
        descriptors: &[ModDescriptor],
    ) -> Vec<ModError> {
        let mut failures = Vec::new();

        for descriptor in descriptors.iter().rev() {
            if let Err(e) = run_edit(document, descriptor) {
                tracing::error!(mod_id = %descriptor.id(), error = %e, "Mod edit failed");
                failures.push(e);
            }
        }

        document.footnotes.clear();

        for descriptor in descriptors.iter().rev() {
            let groups = match self.footnote_groups(descriptor) {
                Ok(Some(groups)) => groups,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(
                        mod_id = %descriptor.id(),
                        error = %e,
                        "Could not load footnotes"
                    );
                    failures.push(e);
                    continue;
                }
            };
            merge_footnotes(document, &groups);
        }

        failures
    }

    fn footnote_groups(
        &self,
        descriptor: &ModDescriptor,
    ) -> Result<Option<Vec<FootnoteGroup>>, ModError> {
        let id = descriptor.id();
        let groups = match &descriptor.definition().footnotes {
            None => return Ok(None),
            Some(FootnoteSource::File(relative)) => {
                let path = descriptor.resolve_path(relative)?;
                tracing::info!(mod_id = %id, path = %path.display(), "Loading footnotes from file");
                let content = self.fs.read_to_string(&path)?;
                let value = serde_json::from_str(&content)
                    .map_err(|e| ModError::malformed(id, format!("invalid footnotes file: {e}")))?;
                parse_footnote_groups(id, value)?
            }
            Some(FootnoteSource::Groups(groups)) => {
                tracing::info!(mod_id = %id, "Loading footnotes from object");
                groups.clone()
            }
            Some(FootnoteSource::Raw(value)) => parse_footnote_groups(id, value.clone())?,
        };
        Ok(Some(groups))
    }
}

fn run_edit(document: &mut Document, descriptor: &ModDescriptor) -> Result<(), ModError> {
    let Some(edit) = &descriptor.definition().edit else {
        return Ok(());
    };

    let before = document.instance_id();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| edit.apply(document)));

    let result = match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(&*payload))),
    };

    if document.instance_id() != before {
        tracing::error!(
            mod_id = %descriptor.id(),
            "Mod replaced the document instead of editing it"
        );
        return Err(ModError::EditFailed {
            id: descriptor.id().to_string(),
            message: "edit replaced the document".to_string(),
        });
    }

    result.map_err(|message| ModError::EditFailed {
        id: descriptor.id().to_string(),
        message,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
