//! Lenient field decoding for upstream payloads.
//!
//! Any upstream field may be absent, null, or of an unexpected type. These
//! helpers coerce what can be coerced and turn everything else into `None`,
//! so a single odd field never fails a whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a JSON value into an integer.
///
/// Accepts integers, integral floats and numeric strings (surrounding
/// whitespace ignored). Everything else is `None`.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Coerces a JSON value into a non-blank string. Numbers are stringified.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a non-blank string at a JSON pointer path.
pub fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(value_as_string)
}

pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value))
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_string(&value))
}

/// Keeps the value only when it is a JSON object.
pub fn opt_object<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.is_object().then_some(value))
}

/// Keeps an embedded blob that is either serialized text or an inline object.
pub fn opt_blob<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(_) | Value::Object(_) => Some(value),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_i64_coercions() {
        assert_eq!(value_as_i64(&json!(7)), Some(7));
        assert_eq!(value_as_i64(&json!(-3)), Some(-3));
        assert_eq!(value_as_i64(&json!(4.0)), Some(4));
        assert_eq!(value_as_i64(&json!(4.5)), None);
        assert_eq!(value_as_i64(&json!(" 12 ")), Some(12));
        assert_eq!(value_as_i64(&json!("3.0")), Some(3));
        assert_eq!(value_as_i64(&json!("abc")), None);
        assert_eq!(value_as_i64(&json!(true)), None);
        assert_eq!(value_as_i64(&json!(null)), None);
        assert_eq!(value_as_i64(&json!([1])), None);
    }

    #[test]
    fn test_value_as_string_coercions() {
        assert_eq!(value_as_string(&json!("Bergen")), Some("Bergen".to_string()));
        assert_eq!(value_as_string(&json!("   ")), None);
        assert_eq!(value_as_string(&json!(2024)), Some("2024".to_string()));
        assert_eq!(value_as_string(&json!({"name": "x"})), None);
        assert_eq!(value_as_string(&json!(null)), None);
    }

    #[test]
    fn test_string_at_pointer() {
        let blob = json!({"tournament": {"category": {"name": "Norway"}}});
        assert_eq!(
            string_at(&blob, "/tournament/category/name"),
            Some("Norway".to_string())
        );
        assert_eq!(string_at(&blob, "/tournament/name"), None);
    }
}
