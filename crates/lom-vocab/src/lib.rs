#![deny(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # lom-vocab
//!
//! Vocabulary model, built-in defaults, and loaders for LOM deposit forms.
//!
//! A vocabulary maps codes to display labels. Deposit forms consult several
//! of them: contributor roles, licenses, languages, resource types and the
//! OEFOS subject classification.
//!
//! ## Example Usage
//!
//! ```rust
//! use lom_vocab::{Vocabularies, Vocabulary, VocabularyEntry, OEFOS};
//!
//! let mut vocabularies = Vocabularies::builtin();
//! let mut oefos = Vocabulary::new();
//! oefos.insert("1", VocabularyEntry::with_value("1 - Natural Sciences", "Natural Sciences"));
//! vocabularies.insert(OEFOS, oefos);
//!
//! assert_eq!(vocabularies.label(OEFOS, "1"), Some("Natural Sciences"));
//! assert!(vocabularies.contains("contributor", "Author"));
//! ```

pub mod defaults;
pub mod loader;
pub mod vocabulary;

pub use loader::{VocabularyFormat, VocabularyLoader, read_oefos_csv};
pub use vocabulary::{Vocabularies, Vocabulary, VocabularyEntry};

use thiserror::Error;

/// Name of the contributor-role vocabulary.
pub const CONTRIBUTOR: &str = "contributor";
/// Name of the language vocabulary.
pub const LANGUAGE: &str = "language";
/// Name of the license vocabulary.
pub const LICENSE: &str = "license";
/// Name of the OEFOS subject vocabulary.
pub const OEFOS: &str = "oefos";
/// Name of the learning-resource-type vocabulary.
pub const RESOURCETYPE: &str = "resourcetype";

/// Errors that can occur when loading vocabularies
#[derive(Error, Debug)]
pub enum Error {
    #[error("Vocabulary not found: {0}")]
    NotFound(String),

    #[error("Unsupported vocabulary format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("CSV error in {source_name} at line {line}: {message}")]
    Csv {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a parse error for the named source.
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Build a CSV error for the named source.
    pub fn csv(source_name: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self::Csv {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
