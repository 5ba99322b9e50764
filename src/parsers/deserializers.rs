use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a timestamp string. Accepts RFC3339 and naive ISO-8601, which is
/// read as local time (the format older history files were written in).
pub fn parse_timestamp_str(s: &str) -> Result<DateTime<Local>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| format!("invalid timestamp '{}': {}", s, e))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("timestamp '{}' does not exist in the local timezone", s))
}

fn timestamp_from_value(value: Value) -> Result<DateTime<Local>, String> {
    match value {
        Value::Number(n) => {
            // Unix timestamp in milliseconds
            let ms = n.as_i64().ok_or_else(|| "invalid timestamp".to_string())?;
            DateTime::from_timestamp_millis(ms)
                .map(|ts| ts.with_timezone(&Local))
                .ok_or_else(|| "timestamp out of range".to_string())
        }
        Value::String(s) => parse_timestamp_str(&s),
        _ => Err("timestamp must be a number or string".to_string()),
    }
}

/// Custom deserializer for timestamps: integer milliseconds, RFC3339 or naive ISO strings
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    timestamp_from_value(value).map_err(Error::custom)
}

/// Same as [`deserialize_timestamp`] but maps `null` to `None`
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => timestamp_from_value(value).map(Some).map_err(Error::custom),
    }
}
