// scrubline-core/src/logger/mod.rs
//! Structured, scrubbing logger.
//!
//! Every enabled call writes exactly one minified JSON line of the form
//! `{"level":..,"tag":..,"msg":..}` to a [`LogSink`]. Object payloads run
//! through the [`Scrubber`] first (unless scrubbing is switched off); errors are
//! written as `{message, stack}`; anything else is wrapped as `{message: ..}`.
//!
//! Level gating is a plain rank comparison against the configured level. A
//! configured level that is not one of `debug`, `info`, `warn`, `error`
//! (for example `"off"` or `""`) silences the logger completely.
//!
//! A `Logger` owns its configuration and sticky tag. Handlers serving
//! concurrent requests should take a [`Logger::for_request`] handle each, so a
//! tag set for one request never shows up in another request's lines.
//!
//! Logging never fails from the caller's point of view: a payload that cannot
//! be serialized produces a fallback record and a diagnostic through `log`.
//!
//! License: MIT OR APACHE 2.0

pub mod level;
pub mod message;
pub mod sink;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::errors::ScrublineError;
use crate::scrubber::Scrubber;
use crate::value::Value;

pub use level::Level;
pub use message::{LogMessage, LogRecord};
pub use sink::{Channel, ConsoleSink, LogSink, MemorySink};

/// Message used in place of a payload that could not be serialized.
pub const UNSERIALIZABLE_MESSAGE: &str = "unserializable log message";

/// Level and scrubbing switch of a logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level. Kept as text so that unrecognised values can act as an
    /// off switch.
    pub level: String,
    pub scrubbing_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info.as_str().to_string(),
            scrubbing_enabled: true,
        }
    }
}

/// The structured logger. See the module docs.
#[derive(Debug, Clone)]
pub struct Logger<S: LogSink = ConsoleSink> {
    config: LoggerConfig,
    scrubber: Scrubber,
    tag: Option<JsonValue>,
    sink: S,
}

impl Default for Logger<ConsoleSink> {
    fn default() -> Self {
        Self::new(LoggerConfig::default(), Scrubber::default(), ConsoleSink)
    }
}

impl<S: LogSink> Logger<S> {
    pub fn new(config: LoggerConfig, scrubber: Scrubber, sink: S) -> Self {
        Self {
            config,
            scrubber,
            tag: None,
            sink,
        }
    }

    /// Default configuration writing to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self::new(LoggerConfig::default(), Scrubber::default(), sink)
    }

    /// An independent handle for one request: same configuration, scrubber,
    /// tag and sink, but later changes on either side do not affect the other.
    pub fn for_request(&self) -> Self
    where
        S: Clone,
    {
        self.clone()
    }

    pub fn debug(&self, msg: impl Into<LogMessage>) {
        self.log(Level::Debug, msg);
    }

    pub fn info(&self, msg: impl Into<LogMessage>) {
        self.log(Level::Info, msg);
    }

    pub fn warn(&self, msg: impl Into<LogMessage>) {
        self.log(Level::Warn, msg);
    }

    pub fn error(&self, msg: impl Into<LogMessage>) {
        self.log(Level::Error, msg);
    }

    /// Emits one line at `level` if that level is enabled.
    pub fn log(&self, level: Level, msg: impl Into<LogMessage>) {
        if !self.is_level_enabled(level) {
            return;
        }
        let tag = self.tag.as_ref().filter(|t| is_truthy(t));
        let rendered = self
            .render_msg(msg.into())
            .and_then(|msg| LogRecord { level, tag, msg }.to_line());
        let line = match rendered {
            Ok(line) => line,
            Err(e) => {
                warn!("Log message at level '{}' could not be serialized: {}", level, e);
                fallback_line(level, tag, &e)
            }
        };
        self.sink.emit(level.channel(), &line);
    }

    /// True iff `level` names a recognised level at or above the configured one.
    pub fn is_enabled(&self, level: &str) -> bool {
        Level::parse(level).is_some_and(|level| self.is_level_enabled(level))
    }

    pub fn is_level_enabled(&self, level: Level) -> bool {
        Level::parse(&self.config.level).is_some_and(|minimum| level.rank() >= minimum.rank())
    }

    /// Sets the minimum level. Unrecognised names silence the logger.
    pub fn set_level(&mut self, level: impl Into<String>) {
        self.config.level = level.into();
    }

    pub fn level(&self) -> &str {
        &self.config.level
    }

    pub fn set_scrubbing(&mut self, enabled: bool) {
        self.config.scrubbing_enabled = enabled;
    }

    pub fn scrubbing_enabled(&self) -> bool {
        self.config.scrubbing_enabled
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Replaces the sticky tag.
    ///
    /// A non-empty string `s` becomes `{"key": s}`, an object is stored as is,
    /// `null` clears the tag. Other values (including falsy ones such as `""`
    /// or `false`) are stored as given; falsy tags are not written to records.
    pub fn set_tag(&mut self, tag: impl Into<JsonValue>) {
        self.tag = match tag.into() {
            JsonValue::Null => None,
            JsonValue::String(s) if !s.is_empty() => Some(json!({ "key": s })),
            other => Some(other),
        };
    }

    pub fn tag(&self) -> Option<&JsonValue> {
        self.tag.as_ref()
    }

    /// Shallow-merges `tag` over the current tag into a new object.
    ///
    /// An object contributes all its keys, a non-empty string sets `key`;
    /// anything else leaves the current keys as they are.
    pub fn add_tag(&mut self, tag: impl Into<JsonValue>) {
        let mut merged = match &self.tag {
            Some(JsonValue::Object(current)) => current.clone(),
            _ => Map::new(),
        };
        match tag.into() {
            JsonValue::Object(extra) => merged.extend(extra),
            JsonValue::String(s) if !s.is_empty() => {
                merged.insert("key".to_string(), JsonValue::String(s));
            }
            _ => {}
        }
        self.tag = Some(JsonValue::Object(merged));
    }

    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    pub fn scrubber_mut(&mut self) -> &mut Scrubber {
        &mut self.scrubber
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn render_msg(&self, msg: LogMessage) -> Result<JsonValue, ScrublineError> {
        match msg {
            LogMessage::Error { message, stack } => Ok(json!({ "message": message, "stack": stack })),
            LogMessage::Value(value) if value.is_error_like() => {
                let message = field_json(&value, "message")?;
                let stack = field_json(&value, "stack")?;
                Ok(json!({ "message": message, "stack": stack }))
            }
            LogMessage::Value(value @ Value::Object(_)) => {
                if self.config.scrubbing_enabled {
                    Ok(self.scrubber.scrub(&value))
                } else {
                    value.to_json()
                }
            }
            LogMessage::Value(value) => Ok(json!({ "message": value.to_json()? })),
        }
    }
}

fn field_json(value: &Value, key: &str) -> Result<JsonValue, ScrublineError> {
    Ok(value
        .get(key)
        .map(|field| field.to_json())
        .transpose()?
        .unwrap_or_default())
}

fn fallback_line(level: Level, tag: Option<&JsonValue>, error: &ScrublineError) -> String {
    let record = LogRecord {
        level,
        tag,
        msg: json!({ "message": UNSERIALIZABLE_MESSAGE, "error": error.to_string() }),
    };
    record.to_line().unwrap_or_else(|_| {
        format!(
            r#"{{"level":"{}","msg":{{"message":"{}"}}}}"#,
            level, UNSERIALIZABLE_MESSAGE
        )
    })
}

/// JavaScript-style truthiness, used to decide whether a tag is written.
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
