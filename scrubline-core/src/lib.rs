// scrubline-core/src/lib.rs
//! # scrubline Core Library
//!
//! `scrubline-core` provides request/response helpers for serverless HTTP
//! handlers, built around a recursive data scrubber: a cycle-safe,
//! key-pattern-driven redaction engine that is applied to arbitrary nested
//! JSON-like data before it is logged.
//!
//! ## Modules
//!
//! * `value`: The graph-capable data model (shared and cyclic composites).
//! * `matcher`: `KeyMatcher` and `RedactionRule`, deciding which keys are sensitive.
//! * `scrubber`: The recursive `Scrubber`, including JSON embedded in strings.
//! * `logger`: The structured `Logger`, its levels, messages and sinks.
//! * `middleware`: Ordered handler middleware and request logging.
//! * `config`: `ScrublineConfig`, loadable from YAML.
//! * `headless`: One-shot helpers that scrub JSON text.
//! * `errors`: The `ScrublineError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use scrubline_core::{Logger, MemorySink, Scrubber, Value};
//! use serde_json::json;
//!
//! let scrubber = Scrubber::default();
//! let payload = Value::from(json!({"user": "ada", "password": "hunter2"}));
//! payload.insert("self", payload.clone()).unwrap();
//!
//! let scrubbed = scrubber.scrub(&payload);
//! assert_eq!(scrubbed, json!({"user": "ada", "password": "********", "self": "********"}));
//!
//! let sink = MemorySink::new();
//! let logger = Logger::with_sink(sink.clone());
//! logger.info(payload);
//! assert_eq!(sink.records()[0]["msg"]["password"], "********");
//! ```
//!
//! ## Error Handling
//!
//! Scrubbing and logging never fail. Fallible operations (value conversion,
//! pattern compilation, configuration loading) return `ScrublineError` or
//! `anyhow::Error`.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod errors;
pub mod headless;
pub mod logger;
pub mod matcher;
pub mod middleware;
pub mod scrubber;
pub mod value;

/// Re-exports the configuration type.
pub use config::ScrublineConfig;

/// Re-exports the custom error type for clear error reporting.
pub use errors::ScrublineError;

/// Re-exports the data model.
pub use value::Value;

/// Re-exports key matching and the rule type.
pub use matcher::{KeyMatcher, RedactionRule, DEFAULT_REPLACEMENT, DEFAULT_SENSITIVE_KEYS};

/// Re-exports the scrubber.
pub use scrubber::{EmbeddedJsonMode, Scrubber};

/// Re-exports the logger and its supporting types.
pub use logger::{
    Channel, ConsoleSink, Level, LogMessage, LogRecord, LogSink, Logger, LoggerConfig, MemorySink,
    UNSERIALIZABLE_MESSAGE,
};

/// Re-exports the middleware types.
pub use middleware::{
    CorrelationIdSource, Event, HandlerResponse, Middleware, Next, Pipeline, RequestContext,
    RequestLogging, StaticCorrelationId,
};

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{scrub_json_lines, scrub_json_str};
