//! Lenient decoding for numeric rule-table values.
//!
//! Rule tables are hand-edited YAML. A weight written as `"2.5"` is accepted,
//! and anything that is not a number (or a numeric string) becomes `0`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary value into a finite `f64`, defaulting to `0.0`.
pub fn coerce_f64(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

/// Coerce an arbitrary value into a whole number of days, defaulting to `0`.
pub fn coerce_days(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| coerce_f64(value).trunc() as i64),
        _ => coerce_f64(value).trunc() as i64,
    }
}

/// Python-style truthiness for flag-like values.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

pub fn days<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_days(&value))
}

pub fn f64_map<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, coerce_f64(&value)))
        .collect())
}

pub fn days_map<'de, D>(deserializer: D) -> Result<IndexMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, coerce_days(&value)))
        .collect())
}

/// Treat an explicit `null` the same as a missing key.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_f64_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_f64(&json!(3)), 3.0);
        assert_eq!(coerce_f64(&json!(2.5)), 2.5);
        assert_eq!(coerce_f64(&json!(" 1.25 ")), 1.25);
    }

    #[test]
    fn test_coerce_f64_defaults_to_zero() {
        assert_eq!(coerce_f64(&json!("heavy")), 0.0);
        assert_eq!(coerce_f64(&json!(null)), 0.0);
        assert_eq!(coerce_f64(&json!([1, 2])), 0.0);
        assert_eq!(coerce_f64(&json!({"a": 1})), 0.0);
        assert_eq!(coerce_f64(&json!("NaN")), 0.0);
    }

    #[test]
    fn test_coerce_days_truncates() {
        assert_eq!(coerce_days(&json!(14)), 14);
        assert_eq!(coerce_days(&json!(3.9)), 3);
        assert_eq!(coerce_days(&json!("7")), 7);
        assert_eq!(coerce_days(&json!(true)), 0);
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(null)));
        assert!(truthy(&json!(1)));
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!("yes")));
        assert!(!truthy(&json!("")));
    }

    #[test]
    fn test_map_decoders_from_yaml() {
        #[derive(Deserialize)]
        struct Table {
            #[serde(default, deserialize_with = "f64_map")]
            weights: IndexMap<String, f64>,
            #[serde(default, deserialize_with = "days_map")]
            days: IndexMap<String, i64>,
        }

        let table: Table =
            serde_yaml::from_str("weights:\n  reel: 2\n  story: oops\ndays:\n  instagram: '14'\n")
                .unwrap();
        assert_eq!(table.weights["reel"], 2.0);
        assert_eq!(table.weights["story"], 0.0);
        assert_eq!(table.days["instagram"], 14);

        let empty: Table = serde_yaml::from_str("weights: ~\n").unwrap();
        assert!(empty.weights.is_empty());
        assert!(empty.days.is_empty());
    }
}
