//! Century buckets derived from raw `start_year` values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Years below this value are read as short or century-like values.
const SHORT_YEAR_LIMIT: u32 = 100;

fn leading_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)").expect("leading digit pattern is valid"))
}

/// A 1-indexed century used as the temporal aggregation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Century(pub u32);

impl Century {
    /// Create a century bucket directly.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric value of the bucket.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Bucket value as a plotting abscissa.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Derive the century from a raw JSON `start_year` value.
    ///
    /// Strings are trimmed, numbers are read through their JSON text form.
    /// Anything else (absent, null, booleans, arrays, objects) is invalid.
    ///
    /// ```
    /// use serde_json::json;
    /// use zonestat::model::Century;
    ///
    /// assert_eq!(Century::from_raw(Some(&json!(843))), Some(Century(9)));
    /// assert_eq!(Century::from_raw(Some(&json!("12th"))), Some(Century(13)));
    /// assert_eq!(Century::from_raw(None), None);
    /// ```
    pub fn from_raw(raw: Option<&Value>) -> Option<Self> {
        match raw? {
            Value::String(s) => Self::from_year_str(s),
            Value::Number(n) => Self::from_year_str(&n.to_string()),
            _ => None,
        }
    }

    /// Derive the century from the leading digits of a year string.
    ///
    /// Only ASCII digits `0-9` count. Other Unicode decimal digits (such as
    /// Arabic-Indic numerals) make the year invalid.
    pub fn from_year_str(raw: &str) -> Option<Self> {
        let digits = leading_digits().captures(raw.trim())?.get(1)?.as_str();
        let year: u32 = digits.parse().ok()?;
        Some(Self::from_year(year))
    }

    /// Map an already-extracted year to its century.
    pub fn from_year(year: u32) -> Self {
        if year < SHORT_YEAR_LIMIT {
            Self(year + 1)
        } else {
            Self(year / 100 + 1)
        }
    }
}

impl fmt::Display for Century {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_year() {
        assert_eq!(Century::from_raw(Some(&json!(843))), Some(Century(9)));
        assert_eq!(Century::from_raw(Some(&json!(1500))), Some(Century(16)));
        assert_eq!(Century::from_raw(Some(&json!(1499))), Some(Century(15)));
        assert_eq!(Century::from_raw(Some(&json!(100))), Some(Century(2)));
    }

    #[test]
    fn test_short_year_branch() {
        assert_eq!(Century::from_raw(Some(&json!("12th"))), Some(Century(13)));
        assert_eq!(Century::from_raw(Some(&json!(7))), Some(Century(8)));
        assert_eq!(Century::from_raw(Some(&json!("12.."))), Some(Century(13)));
        assert_eq!(Century::from_raw(Some(&json!(99))), Some(Century(100)));
        assert_eq!(Century::from_raw(Some(&json!(0))), Some(Century(1)));
    }

    #[test]
    fn test_strings_and_floats() {
        assert_eq!(Century::from_raw(Some(&json!("  1210 "))), Some(Century(13)));
        assert_eq!(Century::from_raw(Some(&json!("1210-1250"))), Some(Century(13)));
        assert_eq!(Century::from_raw(Some(&json!(843.0))), Some(Century(9)));
        assert_eq!(Century::from_raw(Some(&json!(843.7))), Some(Century(9)));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(Century::from_raw(None), None);
        assert_eq!(Century::from_raw(Some(&Value::Null)), None);
        assert_eq!(Century::from_raw(Some(&json!(true))), None);
        assert_eq!(Century::from_raw(Some(&json!("circa 1200"))), None);
        assert_eq!(Century::from_raw(Some(&json!(""))), None);
        assert_eq!(Century::from_raw(Some(&json!([1200]))), None);
        assert_eq!(Century::from_raw(Some(&json!(-5))), None);
        assert_eq!(Century::from_year_str("99999999999999999999"), None);
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(Century::from_year_str("\u{0668}\u{0664}\u{0663}"), None);
        assert_eq!(Century::from_year_str("\u{FF18}43"), None);
        assert_eq!(Century::from_year_str("843\u{0663}"), Some(Century(9)));
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(Century(9) < Century(13));
        assert_eq!(Century(9).to_string(), "9");
        assert_eq!(Century(9).as_f64(), 9.0);
    }
}
