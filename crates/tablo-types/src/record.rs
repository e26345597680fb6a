use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::path::FieldPath;

/// A single entity from a resource collection.
///
/// Records are opaque JSON objects with one guaranteed property: a
/// scalar `id`. Everything else is reached through [`FieldPath`]
/// lookups declared by the caller, so the controller never assumes a
/// concrete shape. Records are never mutated in place; visible lists
/// are re-derived from the latest fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Wrap a JSON value as a record. The value must be an object
    /// carrying a scalar `id` field.
    pub fn new(value: Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::NotAnObject(summarize(&value)))?;
        match obj.get("id").and_then(Key::from_value) {
            Some(_) => Ok(Self(value)),
            None => Err(Error::MissingId(summarize(&value))),
        }
    }

    pub fn id(&self) -> Key {
        // Guaranteed scalar by the constructor.
        self.0
            .get("id")
            .and_then(Key::from_value)
            .unwrap_or_else(|| Key::Str(String::new()))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.lookup(&self.0)
    }

    /// Field value coerced to a key, for grouping and filter matching.
    pub fn key_at(&self, path: &FieldPath) -> Option<Key> {
        self.get(path).and_then(Key::from_value)
    }

    /// Field value projected to display text. Objects and arrays render
    /// as compact JSON so an unmapped column still shows something
    /// inspectable; null and missing fields yield `None`.
    pub fn text(&self, path: &FieldPath) -> Option<String> {
        match self.get(path)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }
}

fn summarize(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 80 {
        let prefix: String = text.chars().take(77).collect();
        format!("{}...", prefix)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_requires_scalar_id() {
        assert!(Record::new(json!({"id": 1, "name": "Acme"})).is_ok());
        assert!(Record::new(json!({"id": "L-1"})).is_ok());
        assert!(Record::new(json!({"name": "no id"})).is_err());
        assert!(Record::new(json!({"id": {"nested": 1}})).is_err());
        assert!(Record::new(json!("not an object")).is_err());
    }

    #[test]
    fn test_id_types() {
        let r = Record::new(json!({"id": 7})).unwrap();
        assert_eq!(r.id(), Key::Int(7));
        let r = Record::new(json!({"id": "L-7"})).unwrap();
        assert_eq!(r.id(), Key::Str("L-7".to_string()));
    }

    #[test]
    fn test_text_projection() {
        let r = Record::new(json!({
            "id": 1,
            "name": "Acme",
            "value": 1200,
            "active": true,
            "notes": null,
            "stage": {"id": 2}
        }))
        .unwrap();
        assert_eq!(r.text(&"name".into()), Some("Acme".to_string()));
        assert_eq!(r.text(&"value".into()), Some("1200".to_string()));
        assert_eq!(r.text(&"active".into()), Some("true".to_string()));
        assert_eq!(r.text(&"notes".into()), None);
        assert_eq!(r.text(&"missing".into()), None);
        assert_eq!(r.text(&"stage.id".into()), Some("2".to_string()));
    }

    #[test]
    fn test_key_at_nested() {
        let r = Record::new(json!({"id": 1, "stage": {"id": "3"}})).unwrap();
        assert_eq!(r.key_at(&"stage.id".into()), Some(Key::Str("3".to_string())));
    }
}
