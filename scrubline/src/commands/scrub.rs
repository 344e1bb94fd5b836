// scrubline/src/commands/scrub.rs
//! `scrubline scrub`: scrub a JSON document (or newline-delimited JSON).

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{self, Read, Write};

use scrubline_core::{scrub_json_lines, scrub_json_str, ScrublineConfig, Value};

use crate::cli::ScrubCommand;
use crate::commands::load_config;

/// Applies the command line overrides on top of the loaded configuration.
pub fn apply_overrides(mut config: ScrublineConfig, cmd: &ScrubCommand) -> Result<ScrublineConfig> {
    let keys = non_empty(&cmd.keys);
    if !keys.is_empty() {
        debug!("Replacing sensitive keys with {:?}", keys);
        config.sensitive_keys = Some(keys);
    }
    config.extra_sensitive_keys.extend(non_empty(&cmd.extra_keys));
    if let Some(raw) = &cmd.replacement {
        config.replacement_token = Some(parse_replacement(raw)?);
    }
    if let Some(mode) = cmd.embedded_json {
        config.embedded_json = mode.into();
    }
    Ok(config)
}

/// A token that parses as a JSON scalar is used as that scalar; anything else
/// is taken as literal text.
pub fn parse_replacement(raw: &str) -> Result<JsonValue> {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(token @ (JsonValue::Array(_) | JsonValue::Object(_))) => {
            bail!("Replacement token must be a JSON scalar, got {}", token)
        }
        Ok(token) => Ok(token),
        Err(_) => Ok(JsonValue::String(raw.to_string())),
    }
}

/// Scrubs `input` and renders the result.
pub fn scrub_input(config: &ScrublineConfig, input: &str, lines: bool, pretty: bool) -> Result<String> {
    if lines {
        return scrub_json_lines(config, input);
    }
    if !pretty {
        return scrub_json_str(config, input);
    }
    let parsed: JsonValue = serde_json::from_str(input).context("Input is not valid JSON")?;
    let scrubbed = config.build_scrubber().scrub(&Value::from(parsed));
    Ok(serde_json::to_string_pretty(&scrubbed)?)
}

/// Runs the `scrub` command.
pub fn run_scrub(cmd: ScrubCommand) -> Result<()> {
    info!("Starting scrub operation.");
    let config = apply_overrides(load_config(cmd.config.as_deref())?, &cmd)?;

    let input = match &cmd.input_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            if io::stdin().is_terminal() {
                eprintln!("Reading JSON from stdin. Finish with Ctrl-D.");
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    let output = scrub_input(&config, &input, cmd.lines, cmd.pretty)?;
    debug!("Scrubbed {} input bytes into {} output bytes.", input.len(), output.len());

    match &cmd.output {
        Some(path) => {
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Scrubbed output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", output).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn non_empty(keys: &[String]) -> Vec<String> {
    keys.iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_replacement() {
        assert_eq!(parse_replacement("null").unwrap(), JsonValue::Null);
        assert_eq!(parse_replacement("0").unwrap(), json!(0));
        assert_eq!(parse_replacement("[hidden]").unwrap(), json!("[hidden]"));
        assert_eq!(parse_replacement("\"quoted\"").unwrap(), json!("quoted"));
        assert!(parse_replacement("{\"a\":1}").is_err());
    }

    #[test]
    fn test_scrub_input_pretty() {
        let out = scrub_input(&ScrublineConfig::default(), r#"{"pan":"1"}"#, false, true).unwrap();
        assert_eq!(out, "{\n  \"pan\": \"********\"\n}");
    }

    #[test]
    fn test_scrub_input_compact_and_extra_keys() {
        let cmd = ScrubCommand {
            input_file: None,
            output: None,
            config: None,
            keys: Vec::new(),
            extra_keys: vec!["pin".into(), " ".into()],
            replacement: None,
            embedded_json: None,
            lines: false,
            pretty: false,
        };
        let config = apply_overrides(ScrublineConfig::default(), &cmd).unwrap();
        assert_eq!(config.extra_sensitive_keys, vec!["pin"]);

        let input = r#"{"pin":"1","cvc":"2","password":"p"}"#;
        let out = scrub_input(&config, input, false, false).unwrap();
        assert_eq!(out, r#"{"pin":"********","cvc":"2","password":"********"}"#);
        assert_eq!(out, scrub_json_str(&config, input).unwrap());
    }
}
