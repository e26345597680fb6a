use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel value a filter widget reports when the user selects "All".
pub const ALL_SENTINEL: &str = "all";

/// Stable record identifier.
///
/// Backends are inconsistent about id types: the same resource may come
/// back with `"stage": {"id": 3}` from one endpoint and `"stage_id": "3"`
/// from another. `Key` keeps whichever representation arrived and pushes
/// the reconciliation into [`Key::coerced_eq`], so grouping and filter
/// comparisons never depend on which wire form the backend chose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Extract a key from a JSON value, if it is a scalar a key can be
    /// made from. Floats are accepted only when they are whole numbers.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Key::Int(i))
                } else {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0)
                        .map(|f| Key::Int(f as i64))
                }
            }
            Value::String(s) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }

    /// The "no constraint" filter sentinel.
    pub fn all() -> Key {
        Key::Str(ALL_SENTINEL.to_string())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Key::Str(s) if s == ALL_SENTINEL)
    }

    /// Equality after coercing both sides to the same primitive form.
    ///
    /// `Key::Int(3)` and `Key::Str("3")` compare equal; `Key::Str("03")`
    /// does not parse back to the same canonical form and stays unequal
    /// to avoid conflating distinct string ids.
    pub fn coerced_eq(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::Int(a), Key::Int(b)) => a == b,
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::Int(a), Key::Str(s)) | (Key::Str(s), Key::Int(a)) => {
                s.parse::<i64>().map(|p| p == *a && p.to_string() == *s).unwrap_or(false)
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerced_eq_across_representations() {
        assert!(Key::Int(3).coerced_eq(&Key::Str("3".to_string())));
        assert!(Key::Str("3".to_string()).coerced_eq(&Key::Int(3)));
        assert!(Key::Int(3).coerced_eq(&Key::Int(3)));
        assert!(!Key::Int(3).coerced_eq(&Key::Int(4)));
        assert!(!Key::Str("won".to_string()).coerced_eq(&Key::Int(1)));
    }

    #[test]
    fn test_coerced_eq_keeps_padded_strings_distinct() {
        assert!(!Key::Str("03".to_string()).coerced_eq(&Key::Int(3)));
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Key::from_value(&json!(7)), Some(Key::Int(7)));
        assert_eq!(Key::from_value(&json!(7.0)), Some(Key::Int(7)));
        assert_eq!(
            Key::from_value(&json!("won")),
            Some(Key::Str("won".to_string()))
        );
        assert_eq!(Key::from_value(&json!(null)), None);
        assert_eq!(Key::from_value(&json!([1])), None);
    }

    #[test]
    fn test_all_sentinel() {
        assert!(Key::all().is_all());
        assert!(!Key::Str("open".to_string()).is_all());
    }

    #[test]
    fn test_untagged_serde() {
        let k: Key = serde_json::from_str("42").unwrap();
        assert_eq!(k, Key::Int(42));
        let k: Key = serde_json::from_str("\"won\"").unwrap();
        assert_eq!(k, Key::Str("won".to_string()));
    }
}
