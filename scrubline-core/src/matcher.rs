// scrubline-core/src/matcher.rs
//! Key matching for the scrubber.
//!
//! A [`RedactionRule`] pairs a [`KeyMatcher`] (which object keys are sensitive)
//! with the replacement token written in place of their values. Keys match
//! case-insensitively and exactly: `password` matches `PASSWORD` but not
//! `password2`.
//!
//! Setters on the rule never fail. Input that cannot be used is logged and the
//! previous configuration is kept, so a bad runtime reconfiguration cannot take
//! a handler down.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde_json::Value as JsonValue;

use crate::errors::ScrublineError;

/// Keys scrubbed when nothing else is configured.
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
    "pan",
    "CardNumber",
    "TrackOne",
    "IBAN",
    "VerificationCode",
    "BankAccount",
    "pass",
    "password",
    "taxIDs",
    "newPassword",
    "Authorization",
    "soa-auth",
    "number",
];

/// The default replacement token.
pub const DEFAULT_REPLACEMENT: &str = "********";

/// Maximum allowed length for a caller-supplied key pattern.
pub const MAX_PATTERN_LENGTH: usize = 4096;

const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Decides whether an object key is sensitive.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    regex: Regex,
}

impl KeyMatcher {
    /// Builds an "exact match any of" matcher. Returns `None` for an empty list.
    ///
    /// Keys are matched literally; regex metacharacters in a key have no effect.
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!("^(?:{})$", alternation);
        match RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                warn!("Could not build key matcher from {} keys: {}", keys.len(), e);
                None
            }
        }
    }

    /// Compiles a caller-supplied pattern. The pattern is used as written, so
    /// anchoring and case folding are up to the caller.
    pub fn from_pattern(pattern: &str) -> Result<Self, ScrublineError> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(ScrublineError::PatternLengthExceeded(
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
        }
        let regex = RegexBuilder::new(pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| ScrublineError::PatternCompilation(pattern.to_string(), e))?;
        Ok(Self { regex })
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The source of the underlying regex.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for KeyMatcher {
    fn default() -> Self {
        Self::from_keys(DEFAULT_SENSITIVE_KEYS).expect("default sensitive keys compile")
    }
}

/// The sensitive-key matcher plus the token that replaces matched values.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    matcher: KeyMatcher,
    replacement: JsonValue,
}

impl Default for RedactionRule {
    fn default() -> Self {
        Self {
            matcher: KeyMatcher::default(),
            replacement: JsonValue::String(DEFAULT_REPLACEMENT.to_string()),
        }
    }
}

impl RedactionRule {
    pub fn new(matcher: KeyMatcher, replacement: JsonValue) -> Self {
        Self { matcher, replacement }
    }

    pub fn matcher(&self) -> &KeyMatcher {
        &self.matcher
    }

    pub fn replacement(&self) -> &JsonValue {
        &self.replacement
    }

    pub fn matches(&self, key: &str) -> bool {
        self.matcher.matches(key)
    }

    /// Replaces the sensitive key list. An empty list is ignored.
    pub fn set_keys<S: AsRef<str>>(&mut self, keys: &[S]) {
        match KeyMatcher::from_keys(keys) {
            Some(matcher) => {
                debug!("Key matcher replaced with {} keys.", keys.len());
                self.matcher = matcher;
            }
            None => warn!("Ignoring empty or unusable sensitive key list."),
        }
    }

    /// Uses the default keys plus `extra`.
    pub fn set_keys_with_defaults<S: AsRef<str>>(&mut self, extra: &[S]) {
        let keys: Vec<&str> = DEFAULT_SENSITIVE_KEYS
            .iter()
            .copied()
            .chain(extra.iter().map(AsRef::as_ref))
            .collect();
        self.set_keys(&keys);
    }

    pub fn set_matcher(&mut self, matcher: KeyMatcher) {
        debug!("Key matcher replaced with pattern '{}'.", matcher.as_str());
        self.matcher = matcher;
    }

    /// Compiles and installs a caller pattern. An invalid pattern is ignored.
    pub fn set_matcher_pattern(&mut self, pattern: &str) {
        match KeyMatcher::from_pattern(pattern) {
            Ok(matcher) => self.set_matcher(matcher),
            Err(e) => warn!("Ignoring key pattern: {}", e),
        }
    }

    /// Sets the replacement token.
    ///
    /// `None` leaves the token unchanged. `Some(JsonValue::Null)` is a valid
    /// token. Arrays and objects are rejected.
    pub fn set_replacement(&mut self, replacement: Option<JsonValue>) {
        match replacement {
            None => {}
            Some(token @ (JsonValue::Array(_) | JsonValue::Object(_))) => {
                warn!("{}", ScrublineError::InvalidReplacement(token.to_string()));
            }
            Some(token) => {
                debug!("Replacement token set to {}.", token);
                self.replacement = token;
            }
        }
    }
}
