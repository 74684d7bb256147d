//! Per-century aggregation of page statistics.
//!
//! The [`Aggregator`] keeps a running sum and count per (century, metric)
//! and derives means on [`finalize`](Aggregator::finalize). The
//! [`OverlayCollector`] groups page geometry per (century, orientation) for
//! overlay rendering.

mod aggregator;
mod overlay;
mod series;

pub use aggregator::{Aggregator, RunningMean};
pub use overlay::{OverlayCollector, OverlayPage};
pub use series::{MetricSeries, SeriesPoint, SmoothedSeries, TrendTable};

use crate::error::{Error, Result};
use crate::parser::PageFeatures;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A tracked per-page statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// MainZone count
    #[serde(rename = "main")]
    MainZone,
    /// MarginTextZone count
    #[serde(rename = "margin")]
    MarginTextZone,
    /// GraphicZone count
    #[serde(rename = "graphic")]
    GraphicZone,
    /// DropCapitalZone count
    #[serde(rename = "dropcap")]
    DropCapitalZone,
    /// Sum of the four zone counts
    #[serde(rename = "total")]
    TotalZones,
    /// Word tokens over all line contents
    #[serde(rename = "tokens")]
    Tokens,
    /// Page width times height
    #[serde(rename = "area")]
    PageArea,
}

/// Which chart axis a metric is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFamily {
    /// Zone counts per page (primary axis)
    ZoneCount,
    /// Tokens or area per page (secondary axis)
    Secondary,
}

impl Metric {
    /// Every metric, in column order.
    pub const ALL: [Metric; 7] = [
        Metric::MainZone,
        Metric::MarginTextZone,
        Metric::GraphicZone,
        Metric::DropCapitalZone,
        Metric::TotalZones,
        Metric::Tokens,
        Metric::PageArea,
    ];

    /// CSV column name.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::MainZone => "avg_mainzone",
            Metric::MarginTextZone => "avg_margin",
            Metric::GraphicZone => "avg_graphic",
            Metric::DropCapitalZone => "avg_dropcap",
            Metric::TotalZones => "avg_total",
            Metric::Tokens => "avg_tokens",
            Metric::PageArea => "avg_area",
        }
    }

    /// Legend label.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::MainZone => "MainZone",
            Metric::MarginTextZone => "MarginTextZone",
            Metric::GraphicZone => "GraphicZone",
            Metric::DropCapitalZone => "DropCapitalZone",
            Metric::TotalZones => "TotalZones",
            Metric::Tokens => "Tokens",
            Metric::PageArea => "Page area",
        }
    }

    /// Axis the metric belongs to.
    pub fn family(&self) -> AxisFamily {
        match self {
            Metric::Tokens | Metric::PageArea => AxisFamily::Secondary,
            _ => AxisFamily::ZoneCount,
        }
    }

    /// Pick this metric's value out of a page's features.
    pub fn value(&self, features: &PageFeatures) -> f64 {
        match self {
            Metric::MainZone => features.main,
            Metric::MarginTextZone => features.margin,
            Metric::GraphicZone => features.graphic,
            Metric::DropCapitalZone => features.drop_capital,
            Metric::TotalZones => features.total,
            Metric::Tokens => features.tokens,
            Metric::PageArea => features.area,
        }
    }

    /// Parse a metric name (short name, label or column).
    pub fn parse(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        let metric = match key.as_str() {
            "main" | "mainzone" | "avg_mainzone" => Metric::MainZone,
            "margin" | "margintextzone" | "avg_margin" => Metric::MarginTextZone,
            "graphic" | "graphiczone" | "avg_graphic" => Metric::GraphicZone,
            "dropcap" | "dropcapitalzone" | "avg_dropcap" => Metric::DropCapitalZone,
            "total" | "totalzones" | "avg_total" => Metric::TotalZones,
            "tokens" | "avg_tokens" => Metric::Tokens,
            "area" | "page_area" | "avg_area" => Metric::PageArea,
            _ => return Err(Error::InvalidMetric(s.trim().to_string())),
        };
        Ok(metric)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of tracked metrics, iterated in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeSet<Metric>);

impl MetricSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Every metric.
    pub fn all() -> Self {
        Self(Metric::ALL.into_iter().collect())
    }

    /// Add a metric.
    pub fn with(mut self, metric: Metric) -> Self {
        self.0.insert(metric);
        self
    }

    /// Check if a metric is tracked.
    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains(&metric)
    }

    /// Iterate tracked metrics in column order.
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        self.0.iter().copied()
    }

    /// Number of tracked metrics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no metric is tracked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a comma-separated metric list (e.g., "main,margin,tokens").
    pub fn parse(s: &str) -> Result<Self> {
        let mut set = Self::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            set.0.insert(Metric::parse(part)?);
        }
        if set.is_empty() {
            return Err(Error::InvalidMetric(s.to_string()));
        }
        Ok(set)
    }
}

impl Default for MetricSet {
    /// Zone counts plus tokens.
    fn default() -> Self {
        Self::new()
            .with(Metric::MainZone)
            .with(Metric::MarginTextZone)
            .with(Metric::GraphicZone)
            .with(Metric::TotalZones)
            .with(Metric::Tokens)
    }
}

impl FromIterator<Metric> for MetricSet {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
