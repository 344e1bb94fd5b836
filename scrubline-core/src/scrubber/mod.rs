// scrubline-core/src/scrubber/mod.rs
//! The recursive scrubber.
//!
//! [`Scrubber::scrub`] walks a [`Value`] graph and produces a new JSON tree in
//! which every value held under a sensitive key is replaced by the rule's token.
//! The input is never modified.
//!
//! Cycle handling is identity based: every composite is recorded the first time
//! it is entered, and any later encounter within the same call yields the
//! replacement token. This also applies to a composite that is merely shared by
//! two parents, which keeps the output bounded on heavily aliased graphs.
//!
//! License: MIT OR APACHE 2.0

pub mod embedded;

use std::collections::HashSet;

use log::trace;
use serde_json::{Map, Value as JsonValue};

use crate::matcher::{KeyMatcher, RedactionRule};
use crate::value::Value;

pub use embedded::{scrub_embedded_pairs, EmbeddedJsonMode};

/// Redacts sensitive keys out of arbitrary values.
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    rule: RedactionRule,
    embedded_json: EmbeddedJsonMode,
}

impl Scrubber {
    pub fn new(rule: RedactionRule, embedded_json: EmbeddedJsonMode) -> Self {
        Self { rule, embedded_json }
    }

    pub fn rule(&self) -> &RedactionRule {
        &self.rule
    }

    pub fn rule_mut(&mut self) -> &mut RedactionRule {
        &mut self.rule
    }

    pub fn embedded_json_mode(&self) -> EmbeddedJsonMode {
        self.embedded_json
    }

    pub fn set_embedded_json_mode(&mut self, mode: EmbeddedJsonMode) {
        self.embedded_json = mode;
    }

    pub fn matches(&self, key: &str) -> bool {
        self.rule.matches(key)
    }

    pub fn replacement(&self) -> &JsonValue {
        self.rule.replacement()
    }

    pub fn set_keys<S: AsRef<str>>(&mut self, keys: &[S]) {
        self.rule.set_keys(keys);
    }

    pub fn set_keys_with_defaults<S: AsRef<str>>(&mut self, extra: &[S]) {
        self.rule.set_keys_with_defaults(extra);
    }

    pub fn set_matcher(&mut self, matcher: KeyMatcher) {
        self.rule.set_matcher(matcher);
    }

    pub fn set_replacement(&mut self, replacement: Option<JsonValue>) {
        self.rule.set_replacement(replacement);
    }

    /// Returns a scrubbed copy of `value`.
    ///
    /// Scalars come back unchanged. Arrays are scrubbed element by element;
    /// elements are never key-tested. Objects keep their own keys in order; a
    /// sensitive key gets the token and its value is not descended into.
    pub fn scrub(&self, value: &Value) -> JsonValue {
        let mut visited = HashSet::new();
        self.scrub_within(value, &mut visited)
    }

    /// Convenience for callers that already hold a JSON tree.
    pub fn scrub_json(&self, value: &JsonValue) -> JsonValue {
        self.scrub(&Value::from(value))
    }

    fn scrub_within(&self, value: &Value, visited: &mut HashSet<usize>) -> JsonValue {
        match value {
            Value::Array(items) => {
                if !self.first_visit(value, visited) {
                    return self.rule.replacement().clone();
                }
                let items = items.borrow();
                JsonValue::Array(
                    items
                        .iter()
                        .map(|item| self.scrub_within(item, visited))
                        .collect(),
                )
            }
            Value::Object(entries) => {
                if !self.first_visit(value, visited) {
                    return self.rule.replacement().clone();
                }
                let entries = entries.borrow();
                let mut out = Map::new();
                for (key, original) in entries.iter() {
                    let scrubbed = if self.rule.matches(key) {
                        self.rule.replacement().clone()
                    } else {
                        self.scrub_entry_value(original, visited)
                    };
                    out.insert(key.clone(), scrubbed);
                }
                JsonValue::Object(out)
            }
            scalar => scalar.scalar_json().unwrap_or_default(),
        }
    }

    fn first_visit(&self, value: &Value, visited: &mut HashSet<usize>) -> bool {
        let Some(id) = value.composite_id() else {
            return true;
        };
        let first = visited.insert(id);
        if !first {
            trace!("Composite #{:x} seen twice in one scrub; replacing.", id);
        }
        first
    }

    // Values of non-sensitive object keys. Strings get the embedded JSON pass.
    fn scrub_entry_value(&self, original: &Value, visited: &mut HashSet<usize>) -> JsonValue {
        match original {
            Value::String(text) => JsonValue::String(self.scrub_string(text)),
            other => self.scrub_within(other, visited),
        }
    }

    fn scrub_string(&self, text: &str) -> String {
        match self.embedded_json {
            EmbeddedJsonMode::Off => text.to_string(),
            EmbeddedJsonMode::Regex => scrub_embedded_pairs(text, &self.rule).into_owned(),
            EmbeddedJsonMode::Parse => embedded::parse_container(text)
                .and_then(|parsed| serde_json::to_string(&self.scrub_json(&parsed)).ok())
                .unwrap_or_else(|| text.to_string()),
        }
    }
}
