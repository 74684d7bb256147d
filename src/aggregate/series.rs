//! Finalized per-century series.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::Result;
use crate::model::Century;
use crate::smooth;

use super::Metric;

/// Mean of one metric in one century.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Century bucket
    pub century: Century,
    /// Mean over contributing pages
    pub mean: f64,
}

/// Per-century means of one metric, sorted by century.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    /// The metric
    pub metric: Metric,
    /// Points in ascending century order
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    /// Century abscissae.
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.century.as_f64()).collect()
    }

    /// Mean ordinates.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mean).collect()
    }

    /// Check if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Mean for a given century.
    pub fn mean_at(&self, century: Century) -> Option<f64> {
        self.points
            .binary_search_by_key(&century, |p| p.century)
            .ok()
            .map(|i| self.points[i].mean)
    }

    /// Fit a polynomial of the given degree and evaluate it at every point.
    pub fn smoothed(&self, degree: usize) -> Result<SmoothedSeries> {
        let fitted = smooth::smooth(&self.xs(), &self.ys(), degree)?;
        Ok(SmoothedSeries {
            metric: self.metric,
            points: self.points.clone(),
            fitted,
        })
    }
}

/// Raw series with its polynomial fit evaluated at each century.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    /// The metric
    pub metric: Metric,
    /// Raw points
    pub points: Vec<SeriesPoint>,
    /// Fitted values, one per point
    pub fitted: Vec<f64>,
}

impl SmoothedSeries {
    /// Raw `(century, mean)` pairs.
    pub fn raw(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.century.as_f64(), p.mean))
    }

    /// Smoothed `(century, value)` pairs.
    pub fn curve(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .zip(&self.fitted)
            .map(|(p, &y)| (p.century.as_f64(), y))
    }

    /// Largest raw or fitted value.
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.mean)
            .chain(self.fitted.iter().copied())
            .reduce(f64::max)
    }

    /// Smallest raw or fitted value.
    pub fn min_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.mean)
            .chain(self.fitted.iter().copied())
            .reduce(f64::min)
    }
}

/// All tracked series of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendTable {
    series: Vec<MetricSeries>,
}

impl TrendTable {
    /// Create a table from finalized series.
    pub fn new(series: Vec<MetricSeries>) -> Self {
        Self { series }
    }

    /// All series, in column order.
    pub fn series(&self) -> &[MetricSeries] {
        &self.series
    }

    /// Series of one metric.
    pub fn get(&self, metric: Metric) -> Option<&MetricSeries> {
        self.series.iter().find(|s| s.metric == metric)
    }

    /// Centuries that have a point in any series.
    pub fn centuries(&self) -> BTreeSet<Century> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.century))
            .collect()
    }

    /// Check if no series has any point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(MetricSeries::is_empty)
    }

    /// Smooth every non-empty series.
    pub fn smooth(&self, degree: usize) -> Result<Vec<SmoothedSeries>> {
        self.series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.smoothed(degree))
            .collect()
    }
}
