//! Per-page feature extraction for trend statistics.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{PageEntry, PageSize, ZoneType};

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Split text into word tokens (runs of word characters).
pub fn tokenize(text: &str) -> Vec<&str> {
    word_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Count word tokens without allocating.
pub fn token_count(text: &str) -> usize {
    word_pattern().find_iter(text).count()
}

/// Values one page contributes to the trend metrics.
///
/// Landscape pages carry half weight: every value is already multiplied by
/// [`Orientation::metric_weight`](crate::model::Orientation::metric_weight).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageFeatures {
    /// MainZone count
    pub main: f64,
    /// MarginTextZone count
    pub margin: f64,
    /// GraphicZone count
    pub graphic: f64,
    /// DropCapitalZone count
    pub drop_capital: f64,
    /// Sum of the four counts above
    pub total: f64,
    /// Word tokens over all line contents
    pub tokens: f64,
    /// Page width times height
    pub area: f64,
}

impl PageFeatures {
    /// Extract the weighted features of a page.
    pub fn extract(page: &PageEntry, size: PageSize) -> Self {
        let mut main = 0usize;
        let mut margin = 0usize;
        let mut graphic = 0usize;
        let mut drop_capital = 0usize;
        let mut tokens = 0usize;

        for zone in &page.zones {
            match zone.zone_type {
                ZoneType::MainZone => main += 1,
                ZoneType::MarginTextZone => margin += 1,
                ZoneType::GraphicZone => graphic += 1,
                ZoneType::DropCapitalZone => drop_capital += 1,
                _ => {}
            }
            tokens += zone
                .lines
                .iter()
                .map(|line| token_count(line.text()))
                .sum::<usize>();
        }

        let weight = size.orientation().metric_weight();
        let main = main as f64 * weight;
        let margin = margin as f64 * weight;
        let graphic = graphic as f64 * weight;
        let drop_capital = drop_capital as f64 * weight;

        Self {
            main,
            margin,
            graphic,
            drop_capital,
            total: main + margin + graphic + drop_capital,
            tokens: tokens as f64 * weight,
            area: size.area() * weight,
        }
    }

    /// Check if the page counts as representative (has a MainZone).
    pub fn has_anchor(&self) -> bool {
        self.main > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Zone;

    fn sample_page(width: f64, height: f64) -> PageEntry {
        PageEntry::new(width, height)
            .with_zone(Zone::new("MainZone", 0.0, 0.0, 10.0, 10.0).with_line("In principio erat"))
            .with_zone(Zone::new("MainZone", 0.0, 0.0, 10.0, 10.0).with_line("verbum, et verbum"))
            .with_zone(Zone::new("MarginTextZone", 0.0, 0.0, 5.0, 5.0))
            .with_zone(Zone::new("GraphicZone", 0.0, 0.0, 5.0, 5.0))
            .with_zone(Zone::new("DropCapitalZone", 0.0, 0.0, 5.0, 5.0).with_line("I"))
            .with_zone(Zone::new("NumberingZone", 0.0, 0.0, 5.0, 5.0).with_line("12"))
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("In principio, erat-verbum."), vec!["In", "principio", "erat", "verbum"]);
        assert!(tokenize("").is_empty());
        assert_eq!(token_count("  ;; "), 0);
        assert_eq!(token_count("dñs ꝑ"), 2);
    }

    #[test]
    fn test_extract_portrait() {
        let page = sample_page(1000.0, 1500.0);
        let size = page.size(Default::default()).unwrap();
        let features = PageFeatures::extract(&page, size);

        assert_eq!(features.main, 2.0);
        assert_eq!(features.margin, 1.0);
        assert_eq!(features.graphic, 1.0);
        assert_eq!(features.drop_capital, 1.0);
        assert_eq!(features.total, 5.0);
        assert_eq!(features.tokens, 8.0);
        assert_eq!(features.area, 1_500_000.0);
        assert!(features.has_anchor());
    }

    #[test]
    fn test_landscape_is_exactly_half() {
        let portrait = sample_page(1000.0, 1500.0);
        let landscape = sample_page(1500.0, 1000.0);
        let p = PageFeatures::extract(&portrait, portrait.size(Default::default()).unwrap());
        let l = PageFeatures::extract(&landscape, landscape.size(Default::default()).unwrap());

        assert_eq!(l.main, p.main / 2.0);
        assert_eq!(l.margin, p.margin / 2.0);
        assert_eq!(l.graphic, p.graphic / 2.0);
        assert_eq!(l.drop_capital, p.drop_capital / 2.0);
        assert_eq!(l.total, p.total / 2.0);
        assert_eq!(l.tokens, p.tokens / 2.0);
        assert_eq!(l.area, p.area / 2.0);
    }

    #[test]
    fn test_no_anchor() {
        let page = PageEntry::new(100.0, 100.0).with_zone(Zone::new("MarginTextZone", 0.0, 0.0, 1.0, 1.0));
        let features = PageFeatures::extract(&page, page.size(Default::default()).unwrap());
        assert!(!features.has_anchor());
        assert_eq!(features.total, 1.0);
    }
}
