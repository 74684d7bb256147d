//! Tolerant field decoders for layout records.
//!
//! A wrongly typed page or zone field reads as absent instead of failing the
//! whole record. Later validation then drops only the affected page or zone.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ZoneType;

/// Number pair such as `wh` or `xy`.
///
/// Anything but an array of numbers becomes an empty list, which never
/// validates as a size or position.
pub(crate) fn numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let numbers = match &value {
        Value::Array(items) => items.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>(),
        _ => None,
    };
    if numbers.is_none() {
        log::trace!("Ignoring malformed number list: {}", value);
    }
    Ok(numbers.unwrap_or_default())
}

/// Zone tag. Non-string tags fall back to the default `Other`.
pub(crate) fn zone_type<'de, D>(deserializer: D) -> Result<ZoneType, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(tag) => Ok(ZoneType::from(tag)),
        _ => Ok(ZoneType::default()),
    }
}

/// Optional string. Non-string values read as absent.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// List of records. A non-array reads as empty, and entries that do not
/// decode are skipped one by one.
pub(crate) fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            log::trace!("Ignoring non-list entries: {}", other);
            Vec::new()
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::trace!("Skipping malformed entry: {}", e);
                None
            }
        })
        .collect())
}
