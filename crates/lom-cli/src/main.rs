//! # lom-cli
//!
//! Command-line front end for the LOM deposit serializer.
//!
//! Reads records and error lists as JSON files and writes JSON to stdout (or
//! `--output`). Logs go to stderr.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::CliConfig;
use lom_deposit::{DepositSerializer, FieldError};
use lom_vocab::VocabularyLoader;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lom")]
#[command(about = "LOM deposit record serializer")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Locale for written langstrings (overrides the config)
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill `metadata.form` from a stored record
    Deserialize {
        /// Record JSON file
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Write `metadata.form` back into the LOM fields
    Serialize {
        /// Record JSON file carrying `metadata.form`
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Arrange server validation errors for the form
    Errors {
        /// JSON array of `{field, messages}`
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Print `path: message` lines instead of the JSON tree
        #[arg(long)]
        flat: bool,
    },

    /// Show a vocabulary, or the label of one code
    Vocab {
        /// Vocabulary name (e.g. contributor, oefos)
        name: String,

        /// Code to look up
        #[arg(long)]
        code: Option<String>,
    },
}

/// Failure classes, each with its own exit code
#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("{0:#}")]
    Config(anyhow::Error),

    #[error("{0:#}")]
    Data(anyhow::Error),
}

impl Failure {
    fn exit_code(&self) -> u8 {
        match self {
            Failure::Data(_) => 2,
            Failure::Config(_) => 3,
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        Failure::Data(error)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("ERROR: {failure}");
            ExitCode::from(failure.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Failure> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)
            .await
            .map_err(|e| Failure::Config(e.into()))?,
        None => CliConfig::default(),
    };
    let locale = config.resolve_locale(cli.locale.as_deref());
    let vocabularies = config
        .load_vocabularies(&VocabularyLoader::new())
        .map_err(|e| Failure::Config(e.into()))?;
    tracing::info!("Using locale {}", locale);

    let serializer = DepositSerializer::new(locale, vocabularies);

    match cli.command {
        Commands::Deserialize {
            input,
            output,
            pretty,
        } => {
            let record = read_json(&input).await?;
            let result = serializer
                .deserialize_value(record)
                .with_context(|| format!("Cannot deserialize {}", input.display()))?;
            write_output(output.as_deref(), &render(&result, pretty)?).await?;
        }
        Commands::Serialize {
            input,
            output,
            pretty,
        } => {
            let record = read_json(&input).await?;
            let result = serializer
                .serialize_value(record)
                .with_context(|| format!("Cannot serialize {}", input.display()))?;
            write_output(output.as_deref(), &render(&result, pretty)?).await?;
        }
        Commands::Errors {
            input,
            output,
            pretty,
            flat,
        } => {
            let errors: Vec<FieldError> = serde_json::from_value(read_json(&input).await?)
                .with_context(|| format!("{} is not a list of field errors", input.display()))?;
            let model = serializer.deserialize_errors(&errors);
            tracing::debug!("Mapped {} error(s)", errors.len());

            let text = if flat {
                model
                    .entries()
                    .into_iter()
                    .map(|(path, message)| format!("{path}: {message}\n"))
                    .collect()
            } else {
                render(model.as_value(), pretty)?
            };
            write_output(output.as_deref(), &text).await?;
        }
        Commands::Vocab { name, code } => {
            let vocabulary = serializer
                .vocabularies()
                .get(&name)
                .with_context(|| {
                    format!(
                        "Unknown vocabulary '{}' (available: {})",
                        name,
                        serializer.vocabularies().names().join(", ")
                    )
                })?;
            let text = match code {
                Some(code) => {
                    let label = vocabulary
                        .label(&code)
                        .with_context(|| format!("No code '{code}' in vocabulary '{name}'"))?;
                    format!("{label}\n")
                }
                None => render(&serde_json::to_value(vocabulary).context("Cannot render vocabulary")?, true)?,
            };
            write_output(None, &text).await?;
        }
    }
    Ok(())
}

async fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn render(value: &Value, pretty: bool) -> anyhow::Result<String> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    Ok(text)
}

async fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("Cannot write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
