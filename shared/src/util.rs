//! Lenient parsing helpers
//!
//! The backend is loosely typed: numbers sometimes arrive as strings, optional
//! fields arrive as `null`, timestamps come in two formats. Everything here
//! degrades to `None`/default instead of failing the whole payload.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Naive timestamp formats, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a server timestamp.
///
/// Accepts RFC 3339 (`2026-10-18T12:00:00.123456+00:00`) and the naive
/// `2026-10-18 12:00:00` form. Returns `None` on empty or garbage input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Convert a JSON value into an integer the way a browser `Number()` would,
/// truncating fractions. Non-finite and non-numeric values yield `None`.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?
        }
        Value::Bool(b) => i64::from(*b),
        _ => return None,
    };
    Some(number)
}

/// Optional text field; anything but a JSON string reads as `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Text field; anything but a JSON string reads as empty.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Strict integer identifiers: only JSON numbers count.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

/// Numeric fields that may arrive as numbers or numeric strings.
pub fn opt_numeric<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

/// Numeric field with a zero fallback.
pub fn numeric_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_numeric(deserializer)?.unwrap_or(0))
}

/// Truthiness of an arbitrary JSON value.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

/// Lists where malformed elements are dropped instead of failing the payload.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2026-10-18T12:30:00.123456+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_naive_formats_as_utc() {
        let ts = parse_timestamp("2026-10-18 09:15:00").unwrap();
        assert_eq!((ts.day(), ts.hour(), ts.minute()), (18, 9, 15));

        let ts = parse_timestamp("2026-10-18T09:15:00.5").unwrap();
        assert_eq!(ts.hour(), 9);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[derive(Debug, serde::Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "opt_string")]
        at: Option<String>,
        #[serde(default, deserialize_with = "string_or_empty")]
        who: String,
    }

    #[test]
    fn test_text_helpers_ignore_other_types() {
        let ok: Stamped = serde_json::from_str(r#"{"at": "2026-10-18", "who": "Asha"}"#).unwrap();
        assert_eq!(ok.at.as_deref(), Some("2026-10-18"));
        assert_eq!(ok.who, "Asha");

        let odd: Stamped = serde_json::from_str(r#"{"at": 17, "who": null}"#).unwrap();
        assert_eq!(odd.at, None);
        assert_eq!(odd.who, "");

        let missing: Stamped = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.at, None);
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(value_as_i64(&serde_json::json!(20)), Some(20));
        assert_eq!(value_as_i64(&serde_json::json!("15")), Some(15));
        assert_eq!(value_as_i64(&serde_json::json!(2.9)), Some(2));
        assert_eq!(value_as_i64(&serde_json::json!("abc")), None);
        assert_eq!(value_as_i64(&serde_json::json!(null)), None);
    }
}
