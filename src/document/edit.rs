//! Document transforms contributed by mods.
//!
//! Native mods implement [`DocumentEdit`] directly (closures work). Data-only
//! mods declare an ordered list of JSON-Pointer operations:
//!
//! ```json
//! "edit": [
//!   {"op": "set", "path": "/pages/001/title", "value": "Renamed"},
//!   {"op": "remove", "path": "/pages/002"}
//! ]
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::model::Document;
use crate::BoxError;

/// Mutates the shared document in place. Must not replace it wholesale.
pub trait DocumentEdit: Send + Sync {
    fn apply(&self, document: &mut Document) -> Result<(), BoxError>;
}

impl<F> DocumentEdit for F
where
    F: Fn(&mut Document) -> Result<(), BoxError> + Send + Sync,
{
    fn apply(&self, document: &mut Document) -> Result<(), BoxError> {
        self(document)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("invalid JSON pointer '{0}'")]
    InvalidPointer(String),

    #[error("no value at '{0}'")]
    Missing(String),

    #[error("cannot index into a scalar at '{0}'")]
    NotAContainer(String),

    #[error("array index '{index}' out of bounds at '{pointer}'")]
    IndexOutOfBounds { pointer: String, index: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditOp {
    Set { path: String, value: Value },
    Remove { path: String },
}

impl EditOp {
    fn apply(&self, root: &mut Value) -> Result<(), EditError> {
        match self {
            EditOp::Set { path, value } => set_pointer(root, path, value.clone()),
            EditOp::Remove { path } => remove_pointer(root, path),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript(pub Vec<EditOp>);

impl DocumentEdit for EditScript {
    fn apply(&self, document: &mut Document) -> Result<(), BoxError> {
        let mut root = Value::Object(std::mem::take(&mut document.data));
        let result = self.0.iter().try_for_each(|op| op.apply(&mut root));
        if let Value::Object(data) = root {
            document.data = data;
        }
        result.map_err(Into::into)
    }
}

/// Shared handle to a mod's edit function.
#[derive(Clone)]
pub struct ModEdit(Arc<dyn DocumentEdit>);

impl ModEdit {
    pub fn new(edit: impl DocumentEdit + 'static) -> Self {
        Self(Arc::new(edit))
    }

    pub fn apply(&self, document: &mut Document) -> Result<(), BoxError> {
        self.0.apply(document)
    }
}

impl fmt::Debug for ModEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModEdit(..)")
    }
}

impl<'de> Deserialize<'de> for ModEdit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EditScript::deserialize(deserializer).map(ModEdit::new)
    }
}

fn split_pointer(pointer: &str) -> Result<(&str, String), EditError> {
    match pointer.rsplit_once('/') {
        Some((parent, token)) if pointer.starts_with('/') => {
            Ok((parent, token.replace("~1", "/").replace("~0", "~")))
        }
        _ => Err(EditError::InvalidPointer(pointer.to_string())),
    }
}

fn set_pointer(root: &mut Value, pointer: &str, value: Value) -> Result<(), EditError> {
    let (parent, token) = split_pointer(pointer)?;
    let target = root
        .pointer_mut(parent)
        .ok_or_else(|| EditError::Missing(parent.to_string()))?;

    match target {
        Value::Object(map) => {
            map.insert(token, value);
            Ok(())
        }
        Value::Array(items) => {
            if token == "-" {
                items.push(value);
                return Ok(());
            }
            match token.parse::<usize>() {
                Ok(i) if i < items.len() => items[i] = value,
                Ok(i) if i == items.len() => items.push(value),
                _ => {
                    return Err(EditError::IndexOutOfBounds {
                        pointer: pointer.to_string(),
                        index: token,
                    });
                }
            }
            Ok(())
        }
        _ => Err(EditError::NotAContainer(parent.to_string())),
    }
}

fn remove_pointer(root: &mut Value, pointer: &str) -> Result<(), EditError> {
    let (parent, token) = split_pointer(pointer)?;
    let target = root
        .pointer_mut(parent)
        .ok_or_else(|| EditError::Missing(parent.to_string()))?;

    let removed = match target {
        Value::Object(map) => map.remove(&token).is_some(),
        Value::Array(items) => match token.parse::<usize>() {
            Ok(i) if i < items.len() => {
                items.remove(i);
                true
            }
            _ => false,
        },
        _ => return Err(EditError::NotAContainer(parent.to_string())),
    };

    if removed {
        Ok(())
    } else {
        Err(EditError::Missing(pointer.to_string()))
    }
}
