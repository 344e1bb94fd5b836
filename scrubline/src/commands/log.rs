// scrubline/src/commands/log.rs
//! `scrubline log`: emit one structured log line through the scrubbing logger.

use anyhow::Result;
use log::debug;
use serde_json::Value as JsonValue;

use scrubline_core::{ConsoleSink, Level, LogMessage, LogSink, Logger};

use crate::cli::LogCommand;
use crate::commands::load_config;

/// Builds the logger described by the command and its configuration file.
pub fn build_logger<S: LogSink>(cmd: &LogCommand, sink: S) -> Result<Logger<S>> {
    let config = load_config(cmd.config.as_deref())?;
    let mut logger = config.build_logger(sink);
    if let Some(min_level) = &cmd.min_level {
        logger.set_level(min_level.as_str());
    }
    if cmd.no_scrub {
        logger.set_scrubbing(false);
    }
    if let Some(tag) = &cmd.tag {
        logger.set_tag(parse_json_or_text(tag));
    }
    Ok(logger)
}

/// JSON text becomes the parsed value; anything else is kept as a string.
pub fn parse_json_or_text(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

/// Runs the `log` command, writing to the console.
pub fn run_log(cmd: LogCommand) -> Result<()> {
    let logger = build_logger(&cmd, ConsoleSink)?;
    let level = Level::from(cmd.level);
    if !logger.is_level_enabled(level) {
        debug!("Level '{}' is below the configured minimum '{}'; nothing written.", level, logger.level());
        return Ok(());
    }
    logger.log(level, LogMessage::from(parse_json_or_text(&cmd.message)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LevelChoice;
    use scrubline_core::MemorySink;
    use serde_json::json;

    fn command(message: &str) -> LogCommand {
        LogCommand {
            level: LevelChoice::Info,
            min_level: None,
            tag: None,
            no_scrub: false,
            config: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_text_tag_and_json_message() {
        let mut cmd = command(r#"{"password":"p"}"#);
        cmd.tag = Some("checkout".into());
        let sink = MemorySink::new();
        let logger = build_logger(&cmd, sink.clone()).unwrap();
        logger.log(Level::Info, LogMessage::from(parse_json_or_text(&cmd.message)));
        assert_eq!(
            sink.lines()[0].1,
            r#"{"level":"info","tag":{"key":"checkout"},"msg":{"password":"********"}}"#
        );
    }

    #[test]
    fn test_min_level_off_silences() {
        let mut cmd = command("hello");
        cmd.min_level = Some("off".into());
        let logger = build_logger(&cmd, MemorySink::new()).unwrap();
        assert!(!logger.is_level_enabled(Level::Error));
    }

    #[test]
    fn test_parse_json_or_text() {
        assert_eq!(parse_json_or_text("42"), json!(42));
        assert_eq!(parse_json_or_text("plain words"), json!("plain words"));
    }
}
