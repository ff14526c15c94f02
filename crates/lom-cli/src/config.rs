//! CLI configuration file

use lom_vocab::{Vocabularies, VocabularyLoader};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while reading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("Default locale '{0}' is not a supported locale")]
    UnsupportedDefault(String),

    #[error(transparent)]
    Vocabulary(#[from] lom_vocab::Error),
}

/// Contents of `--config`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Active UI locale
    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default = "default_locale")]
    pub default_locale: String,

    #[serde(default = "supported_locales")]
    pub supported_locales: Vec<String>,

    /// Vocabulary name to file
    #[serde(default)]
    pub vocabularies: BTreeMap<String, PathBuf>,

    /// Directory relative vocabulary paths resolve against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_locale() -> String {
    "en".to_string()
}

fn supported_locales() -> Vec<String> {
    vec!["de".to_string(), "en".to_string()]
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            locale: None,
            default_locale: default_locale(),
            supported_locales: supported_locales(),
            vocabularies: BTreeMap::new(),
            base_dir: None,
        }
    }
}

impl CliConfig {
    /// Parse a YAML config. `path` names the file in errors and provides the
    /// base directory for vocabulary files.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if !config.supported_locales.contains(&config.default_locale) {
            return Err(ConfigError::UnsupportedDefault(config.default_locale));
        }
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Read and parse the config file at `path`.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml(&content, path)
    }

    /// Pick the active locale: `requested`, else `locale`, else
    /// `default_locale`. Unsupported picks fall back to `default_locale`.
    pub fn resolve_locale(&self, requested: Option<&str>) -> String {
        let candidate = requested
            .or(self.locale.as_deref())
            .unwrap_or(self.default_locale.as_str());
        if self.supported_locales.iter().any(|l| l == candidate) {
            candidate.to_string()
        } else {
            warn!(
                "Locale '{}' is not supported, using '{}'",
                candidate, self.default_locale
            );
            self.default_locale.clone()
        }
    }

    /// Built-in vocabularies overlaid with the configured files.
    pub fn load_vocabularies(&self, loader: &VocabularyLoader) -> Result<Vocabularies, ConfigError> {
        let loader = match &self.base_dir {
            Some(base_dir) => loader.clone().with_base_dir(base_dir),
            None => loader.clone(),
        };
        Ok(loader.load_with_defaults(&self.vocabularies)?)
    }
}
