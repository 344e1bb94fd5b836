// scrubline-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot scrubbing of JSON text.
//! Used by the command line tool and by callers that only have strings at hand.

use anyhow::{Context, Result};

use crate::config::ScrublineConfig;
use crate::value::Value;

/// Parses `input` as JSON, scrubs it with the scrubber described by `config`
/// and returns minified JSON text.
///
/// # Arguments
///
/// * `config` - The scrubbing configuration (keys, token, embedded JSON mode).
/// * `input` - A JSON document.
pub fn scrub_json_str(config: &ScrublineConfig, input: &str) -> Result<String> {
    let parsed: serde_json::Value =
        serde_json::from_str(input).context("Input is not valid JSON")?;
    let scrubbed = config.build_scrubber().scrub(&Value::from(parsed));
    serde_json::to_string(&scrubbed).context("Failed to serialize scrubbed document")
}

/// Like [`scrub_json_str`], for newline-delimited JSON. Blank lines are kept
/// as they are; every other line must be a JSON document.
pub fn scrub_json_lines(config: &ScrublineConfig, input: &str) -> Result<String> {
    let scrubber = config.build_scrubber();
    let mut out = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            out.push(line.to_string());
            continue;
        }
        let parsed: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Line {} is not valid JSON", index + 1))?;
        out.push(serde_json::to_string(&scrubber.scrub(&Value::from(parsed)))?);
    }
    Ok(out.join("\n"))
}
