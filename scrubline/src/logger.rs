// scrubline/src/logger.rs
//! Diagnostic logging for the CLI itself.
//!
//! This is the `log`/`env_logger` side channel used for the tool's own
//! messages. It always writes to stderr, so it never mixes with scrubbed
//! documents or structured log lines on stdout.

use log::LevelFilter;

/// Initializes `env_logger`.
///
/// With `Some(level)` the given level wins over `RUST_LOG`; with `None` the
/// environment decides and defaults to `warn`. Calling this more than once is
/// harmless; only the first call takes effect.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init()
        .ok();
}
