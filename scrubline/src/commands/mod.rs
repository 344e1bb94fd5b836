// scrubline/src/commands/mod.rs
//! Implementations of the `scrubline` subcommands.

pub mod log;
pub mod scrub;

use anyhow::Result;
use ::log::debug;
use std::path::Path;

use scrubline_core::ScrublineConfig;

/// Loads the configuration file when one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ScrublineConfig> {
    match path {
        Some(path) => ScrublineConfig::load_from_file(path),
        None => {
            debug!("No configuration file given; using defaults.");
            Ok(ScrublineConfig::default())
        }
    }
}
