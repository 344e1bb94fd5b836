//! Configuration management for `scrubline-core`.
//!
//! This module defines the serializable configuration for the scrubber and the
//! logger and the helpers that turn it into live [`Scrubber`] and [`Logger`]
//! values. Configuration is usually read once at process start, from a YAML
//! file or from defaults, and then threaded to the handlers that need it.
//!
//! ```yaml
//! level: info
//! scrubbing_enabled: true
//! extra_sensitive_keys: [ssn, apiKey]
//! replacement_token: "[redacted]"
//! embedded_json: regex
//! ```
//!
//! License: MIT OR Apache-2.0

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::logger::{LogSink, Logger, LoggerConfig};
use crate::matcher::RedactionRule;
use crate::scrubber::{EmbeddedJsonMode, Scrubber};

/// Top-level configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrublineConfig {
    /// Minimum log level. Any value other than debug/info/warn/error silences the logger.
    pub level: String,
    pub scrubbing_enabled: bool,
    /// Replaces the built-in sensitive key list.
    pub sensitive_keys: Option<Vec<String>>,
    /// Added on top of the built-in list (or on top of `sensitive_keys` when both are set).
    pub extra_sensitive_keys: Vec<String>,
    /// A raw key pattern. Takes precedence over both key lists when set.
    pub key_pattern: Option<String>,
    /// Any JSON scalar. An explicit `null` in the file is kept as a `null` token.
    #[serde(deserialize_with = "deserialize_present")]
    pub replacement_token: Option<JsonValue>,
    pub embedded_json: EmbeddedJsonMode,
}

// Only called when the field is present, so `null` becomes `Some(Null)`.
fn deserialize_present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<JsonValue>, D::Error> {
    JsonValue::deserialize(deserializer).map(Some)
}

impl Default for ScrublineConfig {
    fn default() -> Self {
        let logger = LoggerConfig::default();
        Self {
            level: logger.level,
            scrubbing_enabled: logger.scrubbing_enabled,
            sensitive_keys: None,
            extra_sensitive_keys: Vec::new(),
            key_pattern: None,
            replacement_token: None,
            embedded_json: EmbeddedJsonMode::default(),
        }
    }
}

impl ScrublineConfig {
    /// Loads configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading scrubline configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ScrublineConfig = serde_yml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(keys) = &self.sensitive_keys {
            if keys.is_empty() {
                errors.push("`sensitive_keys` must not be empty when present.".to_string());
            }
            if keys.iter().any(|k| k.is_empty()) {
                errors.push("`sensitive_keys` contains an empty key.".to_string());
            }
        }
        if self.extra_sensitive_keys.iter().any(|k| k.is_empty()) {
            errors.push("`extra_sensitive_keys` contains an empty key.".to_string());
        }
        if let Some(token @ (JsonValue::Array(_) | JsonValue::Object(_))) = &self.replacement_token {
            errors.push(format!("`replacement_token` must be a JSON scalar, got {}.", token));
        }
        if let Some(pattern) = &self.key_pattern {
            if let Err(e) = crate::matcher::KeyMatcher::from_pattern(pattern) {
                errors.push(format!("`key_pattern` is invalid: {}", e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.level.clone(),
            scrubbing_enabled: self.scrubbing_enabled,
        }
    }

    /// Builds the scrubber described by this configuration.
    pub fn build_scrubber(&self) -> Scrubber {
        let mut rule = RedactionRule::default();
        match (&self.sensitive_keys, self.extra_sensitive_keys.is_empty()) {
            (Some(keys), true) => rule.set_keys(keys.as_slice()),
            (Some(keys), false) => {
                let all: Vec<&str> = keys
                    .iter()
                    .chain(self.extra_sensitive_keys.iter())
                    .map(String::as_str)
                    .collect();
                rule.set_keys(&all);
            }
            (None, false) => rule.set_keys_with_defaults(self.extra_sensitive_keys.as_slice()),
            (None, true) => {}
        }
        if let Some(pattern) = &self.key_pattern {
            rule.set_matcher_pattern(pattern);
        }
        rule.set_replacement(self.replacement_token.clone());
        debug!(
            "Built scrubber with matcher '{}' and embedded JSON mode {:?}.",
            rule.matcher().as_str(),
            self.embedded_json
        );
        Scrubber::new(rule, self.embedded_json)
    }

    /// Builds a logger writing to `sink`.
    pub fn build_logger<S: LogSink>(&self, sink: S) -> Logger<S> {
        Logger::new(self.logger_config(), self.build_scrubber(), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ScrublineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ScrublineConfig::default());
        assert_eq!(config.level, "info");
        assert!(config.scrubbing_enabled);
    }

    #[test]
    fn test_sensitive_and_extra_keys_combine() {
        let config = ScrublineConfig {
            sensitive_keys: Some(vec!["alpha".into()]),
            extra_sensitive_keys: vec!["beta".into()],
            ..Default::default()
        };
        let scrubber = config.build_scrubber();
        assert!(scrubber.matches("ALPHA"));
        assert!(scrubber.matches("beta"));
        assert!(!scrubber.matches("password"));
    }

    #[test]
    fn test_key_pattern_wins() {
        let config = ScrublineConfig {
            extra_sensitive_keys: vec!["beta".into()],
            key_pattern: Some("^secret_.*$".into()),
            ..Default::default()
        };
        let scrubber = config.build_scrubber();
        assert!(scrubber.matches("secret_x"));
        assert!(!scrubber.matches("beta"));
    }

    #[test]
    fn test_composite_token_fails_validation() {
        let err = ScrublineConfig::from_yaml_str("replacement_token: [1, 2]").unwrap_err();
        assert!(err.to_string().contains("replacement_token"));
    }

    #[test]
    fn test_null_token_is_kept() {
        let config = ScrublineConfig::from_yaml_str("replacement_token: null").unwrap();
        assert_eq!(config.replacement_token, Some(JsonValue::Null));
        assert_eq!(config.build_scrubber().replacement(), &json!(null));

        let config = ScrublineConfig::from_yaml_str("level: warn").unwrap();
        assert_eq!(config.replacement_token, None);
        assert_eq!(config.build_scrubber().replacement(), &json!("********"));
    }
}
