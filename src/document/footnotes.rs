//! Merging of mod-contributed footnotes into a document's annotation table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{Attribution, Document, Footnote};
use crate::mods::ModError;

/// Author used when neither the note nor its group names one.
pub const UNDEFINED_AUTHOR: &str = "Undefined Author";

/// A note as written by a mod, before defaulting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    #[serde(default, skip_serializing_if = "Attribution::is_absent")]
    pub author: Attribution,
    #[serde(default, skip_serializing_if = "Attribution::is_absent")]
    pub class: Attribution,
    #[serde(default)]
    pub content: String,
}

impl RawNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn author(mut self, author: Attribution) -> Self {
        self.author = author;
        self
    }

    pub fn class(mut self, class: Attribution) -> Self {
        self.class = class;
        self
    }
}

/// A mod's footnotes sharing one default author and class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteGroup {
    #[serde(default, skip_serializing_if = "Attribution::is_absent")]
    pub author: Attribution,
    #[serde(default, skip_serializing_if = "Attribution::is_absent")]
    pub class: Attribution,
    #[serde(default)]
    pub footnotes: BTreeMap<String, Vec<RawNote>>,
}

impl FootnoteGroup {
    fn default_author(&self) -> Attribution {
        Attribution::named(self.author.non_empty().unwrap_or(UNDEFINED_AUTHOR))
    }

    fn default_class(&self) -> Attribution {
        self.class
            .non_empty()
            .map(Attribution::named)
            .unwrap_or_default()
    }
}

/// Validates a raw contribution: it must be an array of footnote groups.
pub fn parse_footnote_groups(mod_id: &str, value: Value) -> Result<Vec<FootnoteGroup>, ModError> {
    if !value.is_array() {
        return Err(ModError::malformed(
            mod_id,
            format!("expected an array of footnote groups, got {}", json_type(&value)),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| ModError::malformed(mod_id, format!("invalid footnote group: {e}")))
}

/// Appends every note of `groups` to its page, in input order.
pub fn merge_footnotes(document: &mut Document, groups: &[FootnoteGroup]) {
    for group in groups {
        let default_author = group.default_author();
        let default_class = group.default_class();

        for (page, notes) in &group.footnotes {
            let bucket = document.footnotes.entry(page.clone()).or_default();
            bucket.extend(notes.iter().map(|note| Footnote {
                author: note
                    .author
                    .resolve(&default_author)
                    .as_deref()
                    .map(str::to_string),
                class: note.class.resolve(&default_class),
                content: note.content.clone(),
            }));
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
