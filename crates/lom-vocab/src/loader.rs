//! Vocabulary loader with a shared parse cache

use crate::vocabulary::{Vocabularies, Vocabulary, VocabularyEntry};
use crate::{Error, Result};
use dashmap::DashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// On-disk vocabulary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyFormat {
    /// `{code: {name, value}}` mapping in YAML
    Yaml,
    /// `{code: {name, value}}` mapping in JSON
    Json,
    /// OEFOS classification export (`;`-separated, one header row)
    OefosCsv,
}

impl VocabularyFormat {
    /// Pick the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any extension other than
    /// `yaml`, `yml`, `json` or `csv`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::OefosCsv),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads vocabulary files, parsing each file at most once
///
/// Clones share the cache, so one loader can serve many edit sessions.
#[derive(Debug, Clone, Default)]
pub struct VocabularyLoader {
    cache: Arc<DashMap<PathBuf, Arc<Vocabulary>>>,
    base_dir: Option<PathBuf>,
}

impl VocabularyLoader {
    /// Create a loader resolving relative paths against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `base_dir` instead.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Resolve `path` against the base directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Load one vocabulary file, serving repeated loads from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the file does not exist, and a
    /// format-specific error when it cannot be parsed.
    pub fn load(&self, path: &Path) -> Result<Arc<Vocabulary>> {
        let resolved = self.resolve(path);
        if !resolved.exists() {
            return Err(Error::NotFound(resolved.display().to_string()));
        }
        let key = std::fs::canonicalize(&resolved)?;

        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for vocabulary: {}", key.display());
            return Ok(Arc::clone(cached.value()));
        }
        trace!("Cache miss for vocabulary: {}", key.display());

        let format = VocabularyFormat::from_path(&key)?;
        let source_name = key.display().to_string();
        let vocabulary = match format {
            VocabularyFormat::Yaml => parse_yaml(&std::fs::read_to_string(&key)?, &source_name)?,
            VocabularyFormat::Json => parse_json(&std::fs::read_to_string(&key)?, &source_name)?,
            VocabularyFormat::OefosCsv => {
                read_oefos_csv(std::fs::File::open(&key)?, &source_name)?
            }
        };
        info!(
            "Loaded vocabulary {} ({} codes)",
            source_name,
            vocabulary.len()
        );

        let vocabulary = Arc::new(vocabulary);
        self.cache.insert(key, Arc::clone(&vocabulary));
        Ok(vocabulary)
    }

    /// Load every `(name, path)` pair into one set.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be loaded.
    pub fn load_all<I, N, P>(&self, sources: I) -> Result<Vocabularies>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<Path>,
    {
        let mut vocabularies = Vocabularies::new();
        for (name, path) in sources {
            let vocabulary = self.load(path.as_ref())?;
            vocabularies.insert(name, Vocabulary::clone(&vocabulary));
        }
        Ok(vocabularies)
    }

    /// Built-in vocabularies overlaid with every configured file.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be loaded.
    pub fn load_with_defaults<I, N, P>(&self, sources: I) -> Result<Vocabularies>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<Path>,
    {
        let mut vocabularies = Vocabularies::builtin();
        vocabularies.extend(self.load_all(sources)?);
        Ok(vocabularies)
    }

    /// Number of parsed files held in the cache.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached parse.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Parse a YAML `{code: {name, value}}` mapping.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the document is not such a mapping.
pub fn parse_yaml(content: &str, source_name: &str) -> Result<Vocabulary> {
    serde_yaml::from_str(content)
        .map_err(|e| Error::parse(source_name, format!("YAML parse error: {e}")))
}

/// Parse a JSON `{code: {name, value}}` mapping.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the document is not such a mapping.
pub fn parse_json(content: &str, source_name: &str) -> Result<Vocabulary> {
    serde_json::from_str(content)
        .map_err(|e| Error::parse(source_name, format!("JSON parse error: {e}")))
}

/// Read the OEFOS classification export.
///
/// The export is `;`-separated with one header row. Column 2 holds the code
/// and column 4 the subject name; each row becomes
/// `code → {name: "<code> - <subject>", value: "<subject>"}`. Rows with an
/// empty code are skipped.
///
/// # Errors
///
/// Returns [`Error::Csv`] for unreadable rows and rows with fewer than four
/// columns.
pub fn read_oefos_csv<R: Read>(reader: R, source_name: &str) -> Result<Vocabulary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut vocabulary = Vocabulary::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| {
            Error::csv(
                source_name,
                e.position().map_or(0, csv::Position::line),
                e.to_string(),
            )
        })?;
        let line = record.position().map_or(0, csv::Position::line);

        let (Some(code), Some(subject)) = (record.get(1), record.get(3)) else {
            return Err(Error::csv(
                source_name,
                line,
                format!("expected at least 4 columns, found {}", record.len()),
            ));
        };
        let code = code.trim();
        if code.is_empty() {
            trace!("Skipping OEFOS row without code at line {}", line);
            continue;
        }
        let subject = subject.trim();
        vocabulary.insert(
            code,
            VocabularyEntry::with_value(format!("{code} - {subject}"), subject),
        );
    }
    Ok(vocabulary)
}
