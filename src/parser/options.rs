//! Parsing options and configuration.

use crate::model::{PageEntry, PageSize};
use serde::{Deserialize, Serialize};

/// Options for reading layout records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Error handling mode for unreadable files
    pub error_mode: ErrorMode,

    /// Which width/height pairs count as valid page sizes
    pub dimension_check: DimensionCheck,

    /// Size assumed for pages whose record has no `wh` key at all
    pub fallback_page_size: Option<[f64; 2]>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (log and skip unreadable files).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable strict mode (abort on the first unreadable file).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the page dimension check.
    pub fn with_dimension_check(mut self, check: DimensionCheck) -> Self {
        self.dimension_check = check;
        self
    }

    /// Set the size used for pages without a `wh` key.
    pub fn with_fallback_page_size(mut self, width: f64, height: f64) -> Self {
        self.fallback_page_size = Some([width, height]);
        self
    }

    /// Resolve the validated size of a page under these options.
    pub fn page_size(&self, page: &PageEntry) -> Option<PageSize> {
        if page.wh.is_empty() {
            if let Some([w, h]) = self.fallback_page_size {
                return PageEntry::new(w, h).size(self.dimension_check);
            }
        }
        page.size(self.dimension_check)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            dimension_check: DimensionCheck::Positive,
            fallback_page_size: None,
        }
    }
}

/// Error handling mode for unreadable files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail on the first unreadable file
    Strict,
    /// Log the failure, skip the file and continue
    #[default]
    Lenient,
}

/// Validity rule for the components of a page width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DimensionCheck {
    /// Both components strictly positive
    #[default]
    Positive,
    /// Both components different from zero
    NonZero,
}

impl DimensionCheck {
    /// Check a single dimension component.
    pub fn accepts(self, value: f64) -> bool {
        match self {
            DimensionCheck::Positive => value > 0.0,
            DimensionCheck::NonZero => value != 0.0,
        }
    }

    /// Parse a check name ("positive" or "non-zero").
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(DimensionCheck::Positive),
            "non-zero" | "nonzero" => Ok(DimensionCheck::NonZero),
            other => Err(format!("unknown dimension check: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .strict()
            .with_dimension_check(DimensionCheck::NonZero)
            .with_fallback_page_size(1000.0, 1000.0);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.dimension_check, DimensionCheck::NonZero);
        assert_eq!(options.fallback_page_size, Some([1000.0, 1000.0]));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.dimension_check, DimensionCheck::Positive);
        assert!(options.fallback_page_size.is_none());
    }

    #[test]
    fn test_fallback_only_for_missing_wh() {
        let options = ParseOptions::new().with_fallback_page_size(1000.0, 1000.0);

        let missing = PageEntry::default();
        assert_eq!(options.page_size(&missing), Some(PageSize::new(1000.0, 1000.0)));

        let broken = PageEntry::new(0.0, 10.0);
        assert_eq!(options.page_size(&broken), None);

        let without = ParseOptions::new();
        assert_eq!(without.page_size(&missing), None);
    }

    #[test]
    fn test_dimension_check_parse() {
        assert_eq!(DimensionCheck::parse("positive"), Ok(DimensionCheck::Positive));
        assert_eq!(DimensionCheck::parse("Non-Zero"), Ok(DimensionCheck::NonZero));
        assert!(DimensionCheck::parse("any").is_err());
    }
}
