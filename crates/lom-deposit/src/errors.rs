//! Validation error redistribution
//!
//! The server reports field errors at record coordinates
//! (`metadata.rights.url`). The form only reads errors at form coordinates
//! for the fields it edits, so matching errors are copied over by a fixed set
//! of [`RedirectRule`]s on top of the raw placement.

use lom_ir::{FieldPath, Traversal, walk};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// One server-side validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dot-path in record coordinates
    pub field: String,

    #[serde(default)]
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn new<I, S>(field: impl Into<String>, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Parsed field path. A field that does not parse becomes a single key
    /// holding the raw text, so its message still lands somewhere visible.
    pub fn path(&self) -> FieldPath {
        FieldPath::parse(&self.field).unwrap_or_else(|_| FieldPath::root().key(self.field.clone()))
    }

    /// Messages joined by single spaces.
    pub fn joined(&self) -> String {
        self.messages.join(" ")
    }
}

/// How a rule's source path is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    Exact,
    /// Segment-aligned prefix; includes the path itself
    Prefix,
}

/// Copy errors found at `source` onto the form field `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub source: FieldPath,
    pub matching: PathMatch,
    pub target: FieldPath,
}

impl RedirectRule {
    pub fn exact(source: &str, target: &str) -> Self {
        Self {
            source: FieldPath::dotted(source),
            matching: PathMatch::Exact,
            target: FieldPath::dotted(target),
        }
    }

    pub fn prefix(source: &str, target: &str) -> Self {
        Self {
            source: FieldPath::dotted(source),
            matching: PathMatch::Prefix,
            target: FieldPath::dotted(target),
        }
    }

    pub fn matches(&self, path: &FieldPath) -> bool {
        match self.matching {
            PathMatch::Exact => *path == self.source,
            PathMatch::Prefix => path.starts_with(&self.source),
        }
    }
}

/// Redirections for every field the deposit form edits.
///
/// Contributor errors collapse onto the list as a whole; per-row attribution
/// is not attempted.
pub fn default_redirects() -> Vec<RedirectRule> {
    vec![
        RedirectRule::exact("metadata.general.title", "metadata.form.title"),
        RedirectRule::prefix("metadata.rights", "metadata.form.license"),
        RedirectRule::prefix("metadata.technical.format", "metadata.form.format"),
        RedirectRule::exact(
            "metadata.educational.learningresourcetype.id",
            "metadata.form.resourcetype",
        ),
        // prefix rather than exact: row-level errors such as
        // `contribute.0.role` also land on the contributor list
        RedirectRule::prefix("metadata.lifecycle.contribute", "metadata.form.contributor"),
        RedirectRule::prefix("metadata.classification", "metadata.form.oefos"),
        // empty tags are dropped before submission, so this rarely fires
        RedirectRule::prefix("metadata.general.keyword", "metadata.form.tag"),
    ]
}

/// Error messages arranged like the record, with form-coordinate copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorModel {
    tree: Value,
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self {
            tree: Value::Object(Map::new()),
        }
    }
}

impl ErrorModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `message` at `path`, replacing whatever was there.
    pub fn set(&mut self, path: &FieldPath, message: impl Into<String>) {
        path.set(&mut self.tree, Value::String(message.into()));
    }

    pub fn get(&self, path: &FieldPath) -> Option<&str> {
        path.get_str(&self.tree)
    }

    /// Every message with its dotted path, in tree order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut collector = MessageCollector::default();
        walk(&self.tree, &mut collector);
        collector.entries
    }

    pub fn is_empty(&self) -> bool {
        match &self.tree {
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.tree
    }

    pub fn into_value(self) -> Value {
        self.tree
    }
}

#[derive(Default)]
struct MessageCollector {
    entries: Vec<(String, String)>,
}

impl Traversal for MessageCollector {
    fn visit(&mut self, value: &Value, path: &FieldPath) {
        if let Value::String(message) = value {
            self.entries.push((path.to_string(), message.clone()));
        }
    }
}

/// Build the error model for `errors`.
///
/// Each error first lands at its own path with its messages space-joined.
/// Then every rule gathers the messages of all matching errors, in input
/// order, and writes them space-joined at its target. A rule with no
/// matching messages writes nothing.
pub fn map_errors(errors: &[FieldError], rules: &[RedirectRule]) -> ErrorModel {
    let mut model = ErrorModel::new();
    let paths: Vec<FieldPath> = errors.iter().map(FieldError::path).collect();

    for (error, path) in errors.iter().zip(&paths) {
        trace!("Placing error at {}", path);
        model.set(path, error.joined());
    }

    for rule in rules {
        let messages: Vec<&str> = errors
            .iter()
            .zip(&paths)
            .filter(|(_, path)| rule.matches(path))
            .flat_map(|(error, _)| error.messages.iter().map(String::as_str))
            .collect();
        if messages.is_empty() {
            continue;
        }
        debug!(
            "Redirecting {} message(s) from {} to {}",
            messages.len(),
            rule.source,
            rule.target
        );
        model.set(&rule.target, messages.join(" "));
    }
    model
}
