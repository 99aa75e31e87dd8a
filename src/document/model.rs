use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// An attribution field that distinguishes "absent" from an explicit `null`.
///
/// `Null` means "no attribution" and survives defaulting; `Absent` (and an
/// empty string) falls back to the group default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attribution {
    #[default]
    Absent,
    Null,
    Named(String),
}

impl Attribution {
    pub fn named(value: impl Into<String>) -> Self {
        Attribution::Named(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Attribution::Absent)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Attribution::Named(value) => Some(value),
            _ => None,
        }
    }

    /// A non-empty `Named` value, the way a group default is read.
    pub(crate) fn non_empty(&self) -> Option<&str> {
        self.as_deref().filter(|v| !v.is_empty())
    }

    pub(crate) fn resolve(&self, default: &Attribution) -> Attribution {
        match self {
            Attribution::Null => Attribution::Null,
            Attribution::Named(value) if !value.is_empty() => Attribution::Named(value.clone()),
            _ => default.clone(),
        }
    }
}

impl Serialize for Attribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attribution::Named(value) => serializer.serialize_str(value),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Attribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(value) => Attribution::Named(value),
            None => Attribution::Null,
        })
    }
}

/// A stored annotation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    /// `None` is an explicit "no attribution".
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Attribution::is_absent")]
    pub class: Attribution,
    #[serde(default)]
    pub content: String,
}

/// Page-number key to the page's annotations, in append order.
pub type FootnoteTable = BTreeMap<String, Vec<Footnote>>;

/// The document shown by the viewer. Mods edit it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub footnotes: FootnoteTable,
    #[serde(flatten)]
    pub data: Map<String, Value>,
    #[serde(skip, default = "Uuid::new_v4")]
    instance: Uuid,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl Document {
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            footnotes: FootnoteTable::new(),
            data,
            instance: Uuid::new_v4(),
        }
    }

    pub fn footnotes_on(&self, page: &str) -> &[Footnote] {
        self.footnotes.get(page).map(Vec::as_slice).unwrap_or_default()
    }

    /// Identity token, stable across in-place edits and clones. Assigning a
    /// freshly built document changes it.
    pub(crate) fn instance_id(&self) -> Uuid {
        self.instance
    }
}
