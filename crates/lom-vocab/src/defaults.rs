//! Built-in vocabularies
//!
//! Used when no vocabulary file is configured for a name. OEFOS has no
//! built-in version; its thousands of codes must be loaded from the
//! classification export.

use crate::vocabulary::{Vocabularies, Vocabulary, VocabularyEntry};
use crate::{CONTRIBUTOR, LANGUAGE, LICENSE, RESOURCETYPE};

const LICENSES: [(&str, &str); 6] = [
    (
        "https://creativecommons.org/licenses/by/4.0",
        "CC BY 4.0 - Creative Commons Attribution 4.0 International",
    ),
    (
        "https://creativecommons.org/licenses/by-nc/4.0",
        "CC BY-NC 4.0 - Creative Commons Attribution Non-Commercial 4.0 International",
    ),
    (
        "https://creativecommons.org/licenses/by-nc-nd/4.0",
        "CC BY-NC-ND 4.0 - Creative Commons Attribution Non-Commercial No-Derivatives 4.0 International",
    ),
    (
        "https://creativecommons.org/licenses/by-nc-sa/4.0",
        "CC BY-NC-SA 4.0 - Creative Commons Attribution Non-Commercial Share-Alike 4.0 International",
    ),
    (
        "https://creativecommons.org/licenses/by-nd/4.0",
        "CC BY-ND 4.0 - Creative Commons Attribution No-Derivatives 4.0 International",
    ),
    (
        "https://creativecommons.org/licenses/by-sa/4.0",
        "CC BY-SA 4.0 - Creative Commons Attribution Share-Alike 4.0 International",
    ),
];

/// Contributor roles offered by the deposit form.
#[must_use]
pub fn contributor() -> Vocabulary {
    ["Author", "Publisher"]
        .into_iter()
        .map(|role| (role, VocabularyEntry::named(role)))
        .collect()
}

/// Record languages.
#[must_use]
pub fn language() -> Vocabulary {
    [("de", "Deutsch"), ("en", "English")]
        .into_iter()
        .map(|(code, name)| (code, VocabularyEntry::named(name)))
        .collect()
}

/// Creative Commons 4.0 licenses.
#[must_use]
pub fn license() -> Vocabulary {
    LICENSES
        .into_iter()
        .map(|(url, name)| (url, VocabularyEntry::named(name)))
        .collect()
}

/// Learning-resource types; the empty code stands for "not specified".
#[must_use]
pub fn resourcetype() -> Vocabulary {
    [("", ""), ("video", "Video")]
        .into_iter()
        .map(|(code, name)| (code, VocabularyEntry::named(name)))
        .collect()
}

impl Vocabularies {
    /// All built-in vocabularies.
    #[must_use]
    pub fn builtin() -> Self {
        let mut vocabularies = Self::new();
        vocabularies.insert(CONTRIBUTOR, contributor());
        vocabularies.insert(LANGUAGE, language());
        vocabularies.insert(LICENSE, license());
        vocabularies.insert(RESOURCETYPE, resourcetype());
        vocabularies
    }
}
