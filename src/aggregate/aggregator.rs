//! Running sums and counts per century and metric.

use std::collections::BTreeMap;

use crate::corpus::CorpusVisitor;
use crate::model::{Century, PageEntry, PageSize};
use crate::parser::PageFeatures;

use super::{Metric, MetricSeries, MetricSet, SeriesPoint, TrendTable};

/// Sum and count of the values ingested for one (century, metric) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    /// Sum of contributed values
    pub sum: f64,
    /// Number of contributing pages
    pub count: u64,
}

impl RunningMean {
    /// Add one contribution.
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Mean of the contributions, `None` when nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Accumulates per-century statistics for a set of tracked metrics.
///
/// Only pages holding at least one MainZone contribute, see
/// [`ingest_page`](Aggregator::ingest_page).
#[derive(Debug, Clone)]
pub struct Aggregator {
    tracked: MetricSet,
    buckets: BTreeMap<Century, BTreeMap<Metric, RunningMean>>,
    pages_ingested: u64,
    pages_without_anchor: u64,
}

impl Aggregator {
    /// Create an aggregator for the given metrics.
    pub fn new(tracked: MetricSet) -> Self {
        Self {
            tracked,
            buckets: BTreeMap::new(),
            pages_ingested: 0,
            pages_without_anchor: 0,
        }
    }

    /// Tracked metrics.
    pub fn tracked(&self) -> &MetricSet {
        &self.tracked
    }

    /// Add a value to the running sum of a metric. Untracked metrics are ignored.
    pub fn ingest(&mut self, bucket: Century, metric: Metric, value: f64) {
        if !self.tracked.contains(metric) {
            return;
        }
        self.buckets
            .entry(bucket)
            .or_default()
            .entry(metric)
            .or_default()
            .add(value);
    }

    /// Add every tracked metric of a page.
    ///
    /// Returns `false` and contributes nothing when the page has no MainZone.
    pub fn ingest_page(&mut self, bucket: Century, features: &PageFeatures) -> bool {
        if !features.has_anchor() {
            self.pages_without_anchor += 1;
            return false;
        }
        let stats = self.buckets.entry(bucket).or_default();
        for metric in self.tracked.iter() {
            stats.entry(metric).or_default().add(metric.value(features));
        }
        self.pages_ingested += 1;
        true
    }

    /// Running statistics of one bucket.
    pub fn bucket(&self, bucket: Century) -> Option<&BTreeMap<Metric, RunningMean>> {
        self.buckets.get(&bucket)
    }

    /// Buckets that received at least one contribution, ascending.
    pub fn centuries(&self) -> impl Iterator<Item = Century> + '_ {
        self.buckets.keys().copied()
    }

    /// Number of pages that contributed.
    pub fn pages_ingested(&self) -> u64 {
        self.pages_ingested
    }

    /// Number of pages excluded for lacking a MainZone.
    pub fn pages_without_anchor(&self) -> u64 {
        self.pages_without_anchor
    }

    /// Derive per-century means for every tracked metric.
    ///
    /// Buckets with no contribution for a metric yield no point for it.
    pub fn finalize(&self) -> TrendTable {
        let series = self
            .tracked
            .iter()
            .map(|metric| {
                let points = self
                    .buckets
                    .iter()
                    .filter_map(|(&century, stats)| {
                        let mean = stats.get(&metric)?.mean()?;
                        Some(SeriesPoint { century, mean })
                    })
                    .collect();
                MetricSeries { metric, points }
            })
            .collect();
        TrendTable::new(series)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(MetricSet::default())
    }
}

impl CorpusVisitor for Aggregator {
    fn visit_page(&mut self, century: Century, page: &PageEntry, size: PageSize) {
        let features = PageFeatures::extract(page, size);
        self.ingest_page(century, &features);
    }
}
