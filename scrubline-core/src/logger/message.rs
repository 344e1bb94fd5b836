//! What a caller hands to the logger, and the record written out.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::errors::ScrublineError;
use crate::logger::level::Level;
use crate::value::Value;

/// A message passed to one of the logging entry points.
#[derive(Debug, Clone)]
pub enum LogMessage {
    /// A recognised error: written as `{message, stack}` and never scrubbed.
    Error { message: String, stack: String },
    /// Any other payload. Objects are scrubbed; everything else is wrapped
    /// as `{message: ...}`.
    Value(Value),
}

impl LogMessage {
    pub fn error(message: impl Into<String>, stack: impl Into<String>) -> Self {
        LogMessage::Error {
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Uses the error's display text as the message and its source chain as
    /// the stack.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut stack = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        LogMessage::error(err.to_string(), stack)
    }

    /// True when the message will be rendered as `{message, stack}`.
    pub fn is_error_like(&self) -> bool {
        match self {
            LogMessage::Error { .. } => true,
            LogMessage::Value(value) => value.is_error_like(),
        }
    }
}

impl From<Value> for LogMessage {
    fn from(value: Value) -> Self {
        LogMessage::Value(value)
    }
}

impl From<&Value> for LogMessage {
    fn from(value: &Value) -> Self {
        LogMessage::Value(value.clone())
    }
}

impl From<JsonValue> for LogMessage {
    fn from(json: JsonValue) -> Self {
        LogMessage::Value(json.into())
    }
}

impl From<&str> for LogMessage {
    fn from(s: &str) -> Self {
        LogMessage::Value(s.into())
    }
}

impl From<String> for LogMessage {
    fn from(s: String) -> Self {
        LogMessage::Value(s.into())
    }
}

impl From<bool> for LogMessage {
    fn from(b: bool) -> Self {
        LogMessage::Value(b.into())
    }
}

impl From<i64> for LogMessage {
    fn from(n: i64) -> Self {
        LogMessage::Value(n.into())
    }
}

impl From<f64> for LogMessage {
    fn from(n: f64) -> Self {
        LogMessage::Value(n.into())
    }
}

impl From<anyhow::Error> for LogMessage {
    fn from(err: anyhow::Error) -> Self {
        LogMessage::from(&err)
    }
}

impl From<&anyhow::Error> for LogMessage {
    /// The stack is anyhow's debug rendering: the context chain, plus a
    /// backtrace when one was captured.
    fn from(err: &anyhow::Error) -> Self {
        LogMessage::error(err.to_string(), format!("{:?}", err))
    }
}

impl From<ScrublineError> for LogMessage {
    fn from(err: ScrublineError) -> Self {
        LogMessage::from_error(&err)
    }
}

/// One output line.
#[derive(Debug, Serialize)]
pub struct LogRecord<'a> {
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a JsonValue>,
    pub msg: JsonValue,
}

impl LogRecord<'_> {
    /// Minified, single-line JSON.
    pub fn to_line(&self) -> Result<String, ScrublineError> {
        Ok(serde_json::to_string(self)?)
    }
}
