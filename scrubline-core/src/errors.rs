//! errors.rs - Custom error types for the scrubline-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! The scrubber and the logger never fail. These errors come from the value
//! model and pattern compilation; file loaders return `anyhow::Result` with
//! context instead.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `scrubline-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrublineError {
    #[error("Failed to compile key pattern '{0}': {1}")]
    PatternCompilation(String, regex::Error),

    #[error("Key pattern length ({0}) exceeds maximum allowed ({1})")]
    PatternLengthExceeded(usize, usize),

    #[error("Value references itself and cannot be converted to JSON")]
    CyclicValue,

    #[error("Expected {expected}, found a {found} value")]
    NotAComposite {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),

    #[error("Replacement token must be a JSON scalar, got: {0}")]
    InvalidReplacement(String),

    #[error("Failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
}
