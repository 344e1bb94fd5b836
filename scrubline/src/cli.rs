// scrubline/src/cli.rs
//! This file defines the command-line interface (CLI) for the scrubline
//! application, including all available commands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use scrubline_core::{EmbeddedJsonMode, Level};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "scrubline",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrub sensitive fields out of JSON and emit structured log lines",
    long_about = "scrubline removes the values of sensitive keys (passwords, card numbers, tax ids and the like) from arbitrarily nested JSON documents, including JSON embedded in string values, and can emit single-line structured log records the way a serverless handler would.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable diagnostic messages
    #[arg(long, short = 'q', global = true, help = "Suppress all diagnostic messages.")]
    pub quiet: bool,

    /// Enable debug diagnostics (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug diagnostics on stderr.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `scrubline` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrubs a JSON document read from a file or stdin.
    #[command(about = "Scrubs a JSON document read from a file or stdin.")]
    Scrub(ScrubCommand),

    /// Emits one structured log line.
    #[command(about = "Emits one structured, scrubbed log line.")]
    Log(LogCommand),
}

/// Arguments for the `scrub` command.
#[derive(Parser, Debug)]
pub struct ScrubCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write scrubbed output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Path to a scrubline configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a scrubline configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Replace the sensitive key list (comma-separated).
    #[arg(long, value_delimiter = ',', help = "Use only these sensitive keys (comma-separated).")]
    pub keys: Vec<String>,

    /// Add to the sensitive key list (comma-separated).
    #[arg(long = "extra-keys", value_delimiter = ',', help = "Add these sensitive keys to the list in use (comma-separated).")]
    pub extra_keys: Vec<String>,

    /// Replacement token, parsed as JSON when possible.
    #[arg(long, value_name = "TOKEN", help = "Replacement token. JSON scalars such as null or 0 are used as such; anything else is a string.")]
    pub replacement: Option<String>,

    /// How JSON embedded in string values is handled.
    #[arg(long = "embedded-json", value_name = "MODE", value_enum, help = "How JSON embedded in string values is handled.")]
    pub embedded_json: Option<EmbeddedJsonChoice>,

    /// Treat the input as newline-delimited JSON.
    #[arg(long, help = "Treat the input as newline-delimited JSON, one document per line.")]
    pub lines: bool,

    /// Pretty-print the output document.
    #[arg(long, conflicts_with = "lines", help = "Pretty-print the output document.")]
    pub pretty: bool,
}

/// Arguments for the `log` command.
#[derive(Parser, Debug)]
pub struct LogCommand {
    /// Level the line is emitted at.
    #[arg(long, value_enum, default_value = "info", help = "Level the line is emitted at.")]
    pub level: LevelChoice,

    /// Minimum enabled level. Unknown names silence the logger.
    #[arg(long = "min-level", env = "SCRUBLINE_LOG_LEVEL", value_name = "LEVEL", help = "Minimum enabled level (debug, info, warn, error). Any other value silences output.")]
    pub min_level: Option<String>,

    /// Sticky tag attached to the line.
    #[arg(long, help = "Tag attached to the line. Plain text becomes {\"key\": TEXT}; a JSON object is used as is.")]
    pub tag: Option<String>,

    /// Disable scrubbing of object messages.
    #[arg(long = "no-scrub", help = "Log object messages without scrubbing them.")]
    pub no_scrub: bool,

    /// Path to a scrubline configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a scrubline configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// The message. Parsed as JSON when possible, otherwise logged as text.
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

/// CLI spelling of [`EmbeddedJsonMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbeddedJsonChoice {
    /// Leave strings untouched
    Off,
    /// Rewrite `"key": "value"` pairs in place
    Regex,
    /// Parse, scrub and re-serialize embedded documents
    Parse,
}

impl From<EmbeddedJsonChoice> for EmbeddedJsonMode {
    fn from(choice: EmbeddedJsonChoice) -> Self {
        match choice {
            EmbeddedJsonChoice::Off => EmbeddedJsonMode::Off,
            EmbeddedJsonChoice::Regex => EmbeddedJsonMode::Regex,
            EmbeddedJsonChoice::Parse => EmbeddedJsonMode::Parse,
        }
    }
}

/// CLI spelling of [`Level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelChoice {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LevelChoice> for Level {
    fn from(choice: LevelChoice) -> Self {
        match choice {
            LevelChoice::Debug => Level::Debug,
            LevelChoice::Info => Level::Info,
            LevelChoice::Warn => Level::Warn,
            LevelChoice::Error => Level::Error,
        }
    }
}
