//! Langstrings and vocabulary terms
//!
//! LOM wraps most text in `{"langstring": {"#text": .., "lang": ..}}` so the
//! language travels with the value. Controlled values are wrapped once more as
//! `{"source": <langstring>, "value": <langstring>}`.

use serde_json::{Map, Value, json};

/// Language tag for values that are not in any natural language.
pub const NO_LANGUAGE: &str = "x-none";

/// Vocabulary source for LOM's own controlled values.
pub const LOM_SOURCE: &str = "LOMv1.0";

/// Key of the text inside a langstring.
pub const TEXT_KEY: &str = "#text";

/// A piece of text with an optional language tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangString {
    /// The text itself
    pub text: String,

    /// Language tag; `None` omits the `lang` key entirely
    pub lang: Option<String>,
}

impl LangString {
    /// Create a langstring with a language tag.
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: Some(lang.into()),
        }
    }

    /// Create a langstring without a language tag.
    pub fn untagged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: None,
        }
    }

    /// Read a wrapped langstring (`{"langstring": {...}}`).
    ///
    /// Returns `None` unless `#text` is present and a string.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let inner = value.get("langstring")?;
        let text = inner.get(TEXT_KEY)?.as_str()?;
        let lang = inner.get("lang").and_then(Value::as_str);
        Some(Self {
            text: text.to_string(),
            lang: lang.map(str::to_string),
        })
    }

    /// Wrapped JSON form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut inner = Map::new();
        inner.insert(TEXT_KEY.to_string(), Value::String(self.text.clone()));
        if let Some(lang) = &self.lang {
            inner.insert("lang".to_string(), Value::String(lang.clone()));
        }
        json!({ "langstring": inner })
    }
}

/// Text of a wrapped langstring, if any.
#[must_use]
pub fn langstring_text(value: &Value) -> Option<&str> {
    value.get("langstring")?.get(TEXT_KEY)?.as_str()
}

/// Wrap a controlled value as a LOM vocabulary term.
#[must_use]
pub fn vocabularify(value: &str) -> Value {
    json!({
        "source": LangString::new(LOM_SOURCE, NO_LANGUAGE).to_value(),
        "value": LangString::new(value, NO_LANGUAGE).to_value(),
    })
}
