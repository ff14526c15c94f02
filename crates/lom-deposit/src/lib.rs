#![deny(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

//! # lom-deposit
//!
//! Bidirectional serializer between LOM metadata records and the flat form
//! model a deposit UI edits.
//!
//! A [`DepositSerializer`] carries the session state (active locale and
//! vocabularies) and exposes three operations:
//!
//! - [`deserialize`](DepositSerializer::deserialize) fills `metadata.form`
//!   from the LOM fields of a record,
//! - [`serialize`](DepositSerializer::serialize) writes the form back into the
//!   LOM fields and removes it,
//! - [`deserialize_errors`](DepositSerializer::deserialize_errors) arranges
//!   server validation errors so the form can show them next to its widgets.
//!
//! ```
//! use lom_deposit::DepositSerializer;
//! use lom_vocab::Vocabularies;
//! use serde_json::json;
//!
//! let serializer = DepositSerializer::new("en", Vocabularies::builtin());
//! let record = json!({
//!     "metadata": {
//!         "form": {
//!             "title": "Linear Algebra",
//!             "tag": [{"value": ""}, {"value": "matrices"}]
//!         }
//!     }
//! });
//!
//! let saved = serializer.serialize_value(record).unwrap();
//! assert_eq!(
//!     saved["metadata"]["general"]["keyword"],
//!     json!([{"langstring": {"#text": "matrices", "lang": "en"}}])
//! );
//! ```

/// Contributor grouping between form rows and `lifecycle.contribute`.
pub mod contributor;
/// Error redistribution onto form coordinates.
pub mod errors;
/// Flat form model.
pub mod form;
/// OEFOS classification encode/decode.
pub mod oefos;
/// The serializer itself.
pub mod serializer;

pub use errors::{ErrorModel, FieldError, PathMatch, RedirectRule, default_redirects};
pub use form::{ContributorRow, FormModel, ValueField};
pub use serializer::DepositSerializer;

use thiserror::Error;

/// Errors that can occur while serializing a deposit record
#[derive(Error, Debug)]
pub enum Error {
    #[error("No label for code '{code}' in vocabulary '{vocabulary}'")]
    MissingLabel { vocabulary: String, code: String },

    #[error("Invalid form model: {0}")]
    Form(#[source] serde_json::Error),

    #[error(transparent)]
    Record(#[from] lom_ir::Error),
}

impl Error {
    /// Build a missing-label error for `code` in `vocabulary`.
    pub fn missing_label(vocabulary: impl Into<String>, code: impl Into<String>) -> Self {
        Self::MissingLabel {
            vocabulary: vocabulary.into(),
            code: code.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
