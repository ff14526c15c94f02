//! Vocabulary model

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One code of a vocabulary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Display name shown in pickers (e.g. `"1010 - Mathematics"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Bare label written into records (e.g. `"Mathematics"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl VocabularyEntry {
    /// Entry with only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: None,
        }
    }

    /// Entry with display name and record label.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    /// Label for this entry: `value` when set, else `name`.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.value.as_deref().or(self.name.as_deref())
    }
}

/// A code → entry mapping, ordered by code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    entries: BTreeMap<String, VocabularyEntry>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, code: impl Into<String>, entry: VocabularyEntry) {
        self.entries.insert(code.into(), entry);
    }

    /// Whether `code` is part of the vocabulary.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Entry for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&VocabularyEntry> {
        self.entries.get(code)
    }

    /// Label for `code`.
    #[must_use]
    pub fn label(&self, code: &str) -> Option<&str> {
        self.get(code).and_then(VocabularyEntry::label)
    }

    /// All codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate `(code, entry)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VocabularyEntry)> {
        self.entries.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary has no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>> FromIterator<(C, VocabularyEntry)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (C, VocabularyEntry)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(code, entry)| (code.into(), entry))
                .collect(),
        }
    }
}

/// Named vocabularies, as handed to the deposit form
///
/// Serializes as `{"<name>": {"<code>": {"name": .., "value": ..}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabularies {
    by_name: HashMap<String, Vocabulary>,
}

impl Vocabularies {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named vocabulary.
    pub fn insert(&mut self, name: impl Into<String>, vocabulary: Vocabulary) {
        self.by_name.insert(name.into(), vocabulary);
    }

    /// Vocabulary by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Vocabulary> {
        self.by_name.get(name)
    }

    /// Whether `code` is in vocabulary `name`; false when the vocabulary is
    /// absent.
    #[must_use]
    pub fn contains(&self, name: &str, code: &str) -> bool {
        self.get(name).is_some_and(|vocabulary| vocabulary.contains(code))
    }

    /// Label of `code` in vocabulary `name`.
    #[must_use]
    pub fn label(&self, name: &str, code: &str) -> Option<&str> {
        self.get(name).and_then(|vocabulary| vocabulary.label(code))
    }

    /// Vocabulary names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Overlay `other` onto `self`; vocabularies of the same name are replaced.
    pub fn extend(&mut self, other: Vocabularies) {
        self.by_name.extend(other.by_name);
    }
}
