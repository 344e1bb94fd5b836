// scrubline-core/src/value.rs
//! The data model handed to the scrubber and the logger.
//!
//! `serde_json::Value` is a tree: it cannot express an object that refers back
//! to itself, or one object shared by two parents. Payloads built by handlers
//! can do both, so composites here are shared, interior-mutable handles. The
//! identity of a composite is the address of its allocation, which is what the
//! scrubber uses to break cycles.
//!
//! A cycle built with these handles is an `Rc` cycle and is never freed. That is
//! acceptable for the short-lived payloads this crate deals with.
//!
//! License: MIT OR APACHE 2.0

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};

use crate::errors::ScrublineError;

/// Entries of an object, in insertion order. Keys are unique.
pub type ObjectEntries = Vec<(String, Value)>;

/// A JSON-like value whose composites may be shared or cyclic.
///
/// Cloning a composite clones the handle, not the contents.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<ObjectEntries>>),
}

impl Value {
    /// Creates an empty object.
    pub fn new_object() -> Self {
        Value::Object(Rc::new(RefCell::new(Vec::new())))
    }

    /// Creates an empty array.
    pub fn new_array() -> Self {
        Value::Array(Rc::new(RefCell::new(Vec::new())))
    }

    /// Converts any serializable type. Only the fields the type serializes
    /// end up in the result.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ScrublineError> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// A short name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Identity of a composite: the address of its shared allocation.
    /// Scalars have no identity.
    pub fn composite_id(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Object(entries) => Some(Rc::as_ptr(entries) as *const () as usize),
            _ => None,
        }
    }

    /// Sets `key` on an object, returning the previous value for that key.
    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ScrublineError> {
        let Value::Object(entries) = self else {
            return Err(ScrublineError::NotAComposite {
                expected: "object",
                found: self.kind(),
            });
        };
        let key = key.into();
        let value = value.into();
        let mut entries = entries.borrow_mut();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(&mut slot.1, value)));
        }
        entries.push((key, value));
        Ok(None)
    }

    /// Appends to an array.
    pub fn push(&self, value: impl Into<Value>) -> Result<(), ScrublineError> {
        let Value::Array(items) = self else {
            return Err(ScrublineError::NotAComposite {
                expected: "array",
                found: self.kind(),
            });
        };
        let value = value.into();
        items.borrow_mut().push(value);
        Ok(())
    }

    /// Looks up an own key of an object. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(entries) => entries
                .borrow()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Value::Object(entries) => entries.borrow().iter().any(|(k, _)| k == key),
            _ => false,
        }
    }

    /// True for objects that carry both `message` and `stack` as own keys.
    pub fn is_error_like(&self) -> bool {
        self.contains_key("message") && self.contains_key("stack")
    }

    /// Scalars as JSON; `None` for composites.
    pub(crate) fn scalar_json(&self) -> Option<JsonValue> {
        match self {
            Value::Null => Some(JsonValue::Null),
            Value::Bool(b) => Some(JsonValue::Bool(*b)),
            Value::Number(n) => Some(JsonValue::Number(n.clone())),
            Value::String(s) => Some(JsonValue::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Converts to a JSON tree without scrubbing anything.
    ///
    /// Shared composites are expanded once per parent. A composite that contains
    /// itself fails with [`ScrublineError::CyclicValue`].
    pub fn to_json(&self) -> Result<JsonValue, ScrublineError> {
        let mut ancestors = HashSet::new();
        self.to_json_within(&mut ancestors)
    }

    fn to_json_within(&self, ancestors: &mut HashSet<usize>) -> Result<JsonValue, ScrublineError> {
        if let Some(scalar) = self.scalar_json() {
            return Ok(scalar);
        }
        let id = self.composite_id().unwrap_or_default();
        if !ancestors.insert(id) {
            return Err(ScrublineError::CyclicValue);
        }
        let converted = match self {
            Value::Array(items) => items
                .borrow()
                .iter()
                .map(|item| item.to_json_within(ancestors))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Value::Object(entries) => entries
                .borrow()
                .iter()
                .map(|(k, v)| Ok((k.clone(), v.to_json_within(ancestors)?)))
                .collect::<Result<Map<String, JsonValue>, ScrublineError>>()
                .map(JsonValue::Object),
            _ => unreachable!("scalars return early"),
        };
        ancestors.remove(&id);
        converted
    }
}

impl fmt::Debug for Value {
    // Composites are printed by identity; a derived impl would never finish on a cycle.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => write!(
                f,
                "Array(#{:x}, len={})",
                self.composite_id().unwrap_or_default(),
                items.try_borrow().map(|i| i.len()).unwrap_or_default()
            ),
            Value::Object(entries) => write!(
                f,
                "Object(#{:x}, len={})",
                self.composite_id().unwrap_or_default(),
                entries.try_borrow().map(|e| e.len()).unwrap_or_default()
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(Rc::new(RefCell::new(
                items.into_iter().map(Value::from).collect(),
            ))),
            JsonValue::Object(map) => Value::Object(Rc::new(RefCell::new(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ))),
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        Value::from(json.clone())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_existing_key() {
        let obj = Value::new_object();
        assert!(obj.insert("a", 1).unwrap().is_none());
        let previous = obj.insert("a", 2).unwrap();
        assert!(matches!(previous, Some(Value::Number(_))));
        assert_eq!(obj.to_json().unwrap(), json!({"a": 2}));
    }

    #[test]
    fn test_insert_on_scalar_is_an_error() {
        let err = Value::from("text").insert("a", 1).unwrap_err();
        assert!(matches!(err, ScrublineError::NotAComposite { expected: "object", .. }));
    }

    #[test]
    fn test_to_json_keeps_insertion_order() {
        let obj = Value::new_object();
        obj.insert("zeta", 1).unwrap();
        obj.insert("alpha", 2).unwrap();
        let text = serde_json::to_string(&obj.to_json().unwrap()).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_to_json_rejects_cycle() {
        let obj = Value::new_object();
        obj.insert("self", obj.clone()).unwrap();
        assert!(matches!(obj.to_json(), Err(ScrublineError::CyclicValue)));
    }

    #[test]
    fn test_to_json_expands_shared_composite_per_parent() {
        let shared = Value::from(json!({"x": 1}));
        let root = Value::new_object();
        root.insert("a", shared.clone()).unwrap();
        root.insert("b", shared).unwrap();
        assert_eq!(root.to_json().unwrap(), json!({"a": {"x": 1}, "b": {"x": 1}}));
    }

    #[test]
    fn test_clone_shares_identity() {
        let obj = Value::new_object();
        let alias = obj.clone();
        assert_eq!(obj.composite_id(), alias.composite_id());
        assert_ne!(obj.composite_id(), Value::new_object().composite_id());
        assert_eq!(Value::from(3).composite_id(), None);
    }

    #[test]
    fn test_error_like_needs_both_keys() {
        assert!(Value::from(json!({"message": "m", "stack": "s"})).is_error_like());
        assert!(!Value::from(json!({"message": "m"})).is_error_like());
        assert!(!Value::from(json!(["message", "stack"])).is_error_like());
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert!(matches!(Value::from(f64::NAN), Value::Null));
    }
}
