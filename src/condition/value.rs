use std::fmt;

/// 2^53: whole numbers below this convert to `i64` without loss.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A record's field value after lifting it out of JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Multi-valued fields such as selected users or teams, stored as ids.
    List(Vec<String>),
    Null,
}

impl FieldValue {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Bool(b) => FieldValue::Text(b.to_string()),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.iter().filter_map(json_id).collect())
            }
            serde_json::Value::Object(_) => json_id(value).map_or(FieldValue::Null, FieldValue::Text),
        }
    }

    /// Numeric view of the value. Text is parsed, lists and null are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::List(items) if items.is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    /// Set view of the value; a scalar is a one-element set.
    pub fn as_set(&self) -> Option<Vec<String>> {
        let mut items = match self {
            FieldValue::Null => return None,
            FieldValue::List(items) => items.clone(),
            FieldValue::Number(_) | FieldValue::Text(_) => vec![self.to_string()],
        };
        items.retain(|item| !item.trim().is_empty());
        if items.is_empty() {
            return None;
        }
        items.sort();
        items.dedup();
        Some(items)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// Scalars stringify, objects contribute their `id`.
fn json_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Object(map) => map.get("id").and_then(json_id),
        serde_json::Value::Null | serde_json::Value::Array(_) => None,
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "{}", items.join(",")),
            FieldValue::Null => write!(f, "null"),
        }
    }
}
