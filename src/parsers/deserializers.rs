use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Formats used by Discord data packages for message timestamps without an offset
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Custom deserializer for snowflake ids that may be encoded as strings or integers
///
/// Snowflakes exceed 2^53, so they are kept as strings once read.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match value {
        Value::String(s) => s,
        Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
        Value::Number(_) => return Err(Error::custom("id must be an integer")),
        _ => return Err(Error::custom("id must be a string or number")),
    };

    if id.trim().is_empty() {
        return Err(Error::custom("id cannot be empty"));
    }

    Ok(id)
}

/// Custom deserializer for message timestamps
///
/// Accepts RFC3339 strings, `YYYY-MM-DD HH:MM:SS[.f]` strings (read as UTC),
/// and integer Unix timestamps in milliseconds.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => parse_timestamp_str(&s).map_err(Error::custom),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

fn parse_timestamp_str(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognized timestamp format: {}", s))
}

/// Custom deserializer for the attachments column
///
/// The export writes an empty string when a message has no attachments.
pub fn deserialize_attachments<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
