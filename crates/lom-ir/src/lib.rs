#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # lom-ir
//!
//! Record representation and path APIs for LOM metadata documents.
//!
//! Records exchanged with the persistence layer are arbitrary JSON trees. This
//! crate wraps them in a [`Record`] and offers [`FieldPath`], a segment list
//! with safe optional-chaining semantics: reads of missing paths return `None`,
//! writes create the intermediate containers they need.

/// Langstring and vocabulary-term builders used by the LOM schema.
pub mod langstring;
/// Dot-path segment lists with get/set/remove over JSON trees.
pub mod path;
/// Record container with allow-list picking.
pub mod record;
/// Visitor-based traversal helpers for JSON trees.
pub mod traversal;

/// Langstring primitives.
pub use langstring::{LangString, langstring_text, vocabularify};
/// Path primitives.
pub use path::{FieldPath, Segment};
/// Primary record type.
pub use record::Record;
/// Traversal entry points.
pub use traversal::{Traversal, strip_list_item_keys, walk};

use thiserror::Error;

/// Errors that can occur when working with records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a type-mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Crate-local result type for record operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Short JSON type name used in diagnostics.
#[must_use]
pub fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
