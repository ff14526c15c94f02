//! Dot-path addressing for JSON trees
//!
//! A [`FieldPath`] is an explicit list of segments. Numeric segments such as
//! the `0` in `general.description.0` address array positions; every other
//! segment is an object key. Reads never fail (a missing segment yields
//! `None`), writes create whatever containers are missing on the way down.

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Most `null` slots [`FieldPath::set`] adds to reach an array index.
pub const MAX_PADDING: usize = 1024;

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key
    Key(String),

    /// Array position
    Index(usize),
}

impl Segment {
    /// Classify a raw dot-path component.
    ///
    /// Canonical non-negative integers (`0`, `17`, but not `007`) become
    /// indices, everything else is a key.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));
        match raw.parse::<usize>() {
            Ok(index) if canonical => Segment::Index(index),
            _ => Segment::Key(raw.to_string()),
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A path into a JSON tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, addressing the root itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from a dot-separated string without validation.
    ///
    /// Empty components are kept as empty keys, so any string maps to a
    /// deterministic location.
    #[must_use]
    pub fn dotted(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self {
            segments: path.split('.').map(Segment::from_raw).collect(),
        }
    }

    /// Parse a dot-separated path, rejecting empty paths and empty components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] when the path is empty or contains an
    /// empty component (`a..b`, `.a`, `a.`).
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_path(path, "path is empty"));
        }
        if let Some(position) = path.split('.').position(str::is_empty) {
            return Err(Error::invalid_path(
                path,
                format!("empty component at position {position}"),
            ));
        }
        Ok(Self::dotted(path))
    }

    /// Path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend with an object key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Extend with an array index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Append one segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Remove the innermost segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Concatenate two paths.
    #[must_use]
    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Whether `prefix` matches the leading segments of this path.
    ///
    /// Matching is per segment: `metadata.rights` is a prefix of
    /// `metadata.rights.url` but not of `metadata.rightsholder`.
    #[must_use]
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Read the value at this path.
    #[must_use]
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| child(current, segment))
    }

    /// Read the string at this path, `None` when absent or not a string.
    #[must_use]
    pub fn get_str<'a>(&self, root: &'a Value) -> Option<&'a str> {
        self.get(root).and_then(Value::as_str)
    }

    /// Read the array at this path, empty when absent or not an array.
    #[must_use]
    pub fn get_array<'a>(&self, root: &'a Value) -> &'a [Value] {
        self.get(root)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Write `value` at this path, creating intermediate containers.
    ///
    /// A missing or scalar intermediate is replaced by an array when the next
    /// segment is an index and by an object otherwise. Writing past the end of
    /// an array pads it with `null`, up to [`MAX_PADDING`] slots. An index
    /// further out turns the array into an object keyed by position, so the
    /// value is still readable at this path.
    pub fn set(&self, root: &mut Value, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return;
        };

        let mut current = root;
        for (position, segment) in parents.iter().enumerate() {
            let slot = slot_mut(current, segment);
            if !slot.is_object() && !slot.is_array() {
                *slot = self.segments[position + 1].empty_container();
            }
            current = slot;
        }
        *slot_mut(current, last) = value;
    }

    /// Remove and return the value at this path.
    pub fn remove(&self, root: &mut Value) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = root;
        for segment in parents {
            current = child_mut(current, segment)?;
        }
        match (last, current) {
            (Segment::Key(key), Value::Object(map)) => map.remove(key),
            (Segment::Index(index), Value::Object(map)) => map.remove(&index.to_string()),
            (Segment::Index(index), Value::Array(items)) if *index < items.len() => {
                Some(items.remove(*index))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::dotted(path)
    }
}

fn child<'a>(current: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => map.get(key),
        (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
        (Segment::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}

fn child_mut<'a>(current: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => map.get_mut(key),
        (Segment::Index(index), Value::Object(map)) => map.get_mut(&index.to_string()),
        (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
        _ => None,
    }
}

/// Mutable slot for `segment` inside `container`, coercing the container
/// when its type cannot hold the segment.
fn slot_mut<'a>(container: &'a mut Value, segment: &Segment) -> &'a mut Value {
    match segment {
        Segment::Index(index) if !container.is_object() && within_padding(container, *index) => {
            let items = ensure_array(container);
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
        Segment::Index(index) => ensure_indexed_object(container)
            .entry(index.to_string())
            .or_insert(Value::Null),
        Segment::Key(key) => ensure_object(container)
            .entry(key.clone())
            .or_insert(Value::Null),
    }
}

fn within_padding(container: &Value, index: usize) -> bool {
    let len = container.as_array().map_or(0, Vec::len);
    index.saturating_sub(len) <= MAX_PADDING
}

/// Like [`ensure_object`], but an array keeps its items under their
/// positions (`"0"`, `"1"`, ...).
fn ensure_indexed_object(value: &mut Value) -> &mut Map<String, Value> {
    if let Value::Array(items) = value {
        let keyed: Map<String, Value> = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(position, item)| (position.to_string(), item))
            .collect();
        *value = Value::Object(keyed);
    }
    ensure_object(value)
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

fn ensure_array(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_array() {
        *value = Value::Array(Vec::new());
    }
    match value {
        Value::Array(items) => items,
        _ => unreachable!("value was just replaced by an array"),
    }
}
