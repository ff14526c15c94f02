//! Record container for the persisted metadata document
#![allow(clippy::must_use_candidate)] // Accessors are clear at call sites without #[must_use].

use crate::path::FieldPath;
use crate::{Error, Result, type_name};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// A full record as exchanged with the persistence layer.
///
/// The root is always a JSON object. Everything beneath it is kept verbatim so
/// fields this crate knows nothing about survive a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    root: Map<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an object map.
    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Build a record from any JSON value, treating non-objects as empty.
    pub fn from_value_lossy(value: Value) -> Self {
        match value {
            Value::Object(root) => Self { root },
            other => {
                debug!("Discarding {} record root", type_name(&other));
                Self::default()
            }
        }
    }

    /// Keep only the listed top-level keys, cloning their subtrees.
    pub fn pick(&self, keys: &[&str]) -> Self {
        let root = keys
            .iter()
            .filter_map(|key| {
                self.root
                    .get(*key)
                    .map(|value| ((*key).to_string(), value.clone()))
            })
            .collect();
        Self { root }
    }

    /// Top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Read the value at `path` (relative to the record root).
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        let head = self.root.get(&first.to_string())?;
        let mut tail = FieldPath::root();
        for segment in rest {
            tail.push(segment.clone());
        }
        tail.get(head)
    }

    /// Read the string at `path`, `None` when absent or not a string.
    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// `metadata` subtree, if present.
    pub fn metadata(&self) -> Option<&Value> {
        self.root.get("metadata")
    }

    /// `metadata` subtree, replaced by an empty object when absent or not an
    /// object.
    pub fn metadata_mut(&mut self) -> &mut Value {
        let metadata = self
            .root
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }
        metadata
    }

    /// Write at `path` (relative to the record root).
    pub fn set(&mut self, path: &FieldPath, value: Value) {
        let mut root = Value::Object(std::mem::take(&mut self.root));
        path.set(&mut root, value);
        self.root = match root {
            Value::Object(map) => map,
            _ => Map::new(),
        };
    }

    /// Borrow the root map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Consume into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(Error::type_mismatch("object", type_name(&other))),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}
