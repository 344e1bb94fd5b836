//! embedded.rs - Scrubbing of JSON documents carried inside string values.
//!
//! Handlers often log payloads where one field is itself a serialized JSON
//! document (`"body": "{\"IBAN\":\"...\"}"`). The structural walk only sees a
//! string there, so it needs a second pass.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::matcher::RedactionRule;

/// How string values that contain JSON text are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddedJsonMode {
    /// Strings are left untouched.
    Off,
    /// Every `"<key>" : "<value>"` pair with a sensitive key gets its value
    /// replaced in place. Works on fragments and invalid JSON; everything
    /// outside the replaced values is kept byte for byte.
    #[default]
    Regex,
    /// Strings holding a JSON object or array are parsed, scrubbed structurally
    /// and re-serialized in minified form. Anything else is left untouched.
    Parse,
}

// "key" <ws> : <ws> "value", with backslash escapes allowed inside both strings.
static EMBEDDED_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"(\s*:\s*)"(?:[^"\\]|\\.)*""#)
        .expect("embedded pair pattern compiles")
});

/// Rewrites the quoted values of sensitive keys inside `text`.
///
/// Keys are tested with the rule's matcher, so custom patterns apply here too.
/// The token is written as JSON text: a string token keeps its quotes, `null`
/// or a number is written bare.
pub fn scrub_embedded_pairs<'a>(text: &'a str, rule: &RedactionRule) -> Cow<'a, str> {
    if !text.contains('"') {
        return Cow::Borrowed(text);
    }
    let token = rule.replacement().to_string();
    EMBEDDED_PAIR.replace_all(text, |caps: &Captures| {
        let key = &caps[1];
        if rule.matches(key) {
            format!("\"{}\"{}{}", key, &caps[2], token)
        } else {
            caps[0].to_string()
        }
    })
}

/// Parses `text` as a JSON container. Scalars and invalid JSON yield `None`.
pub(crate) fn parse_container(text: &str) -> Option<JsonValue> {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match serde_json::from_str::<JsonValue>(text) {
        Ok(parsed @ (JsonValue::Object(_) | JsonValue::Array(_))) => Some(parsed),
        _ => None,
    }
}
