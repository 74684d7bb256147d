//! Summary of a pipeline run.

use std::path::PathBuf;

use serde::Serialize;

use crate::corpus::ScanStats;
use crate::model::{Century, Orientation};

/// One overlay image written by a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayOutput {
    /// Century of the group
    pub century: Century,
    /// Orientation of the group
    pub orientation: Orientation,
    /// Number of pages stacked
    pub pages: usize,
    /// Written file
    pub path: PathBuf,
}

/// Files written and statistics collected by a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Files found under the input directory
    pub files_discovered: usize,

    /// Scan counters
    pub stats: ScanStats,

    /// Pages that entered the trend aggregation
    pub pages_aggregated: u64,

    /// Overlay images, in (century, orientation) order
    pub overlays: Vec<OverlayOutput>,

    /// Trend chart, if one was drawn
    pub chart: Option<PathBuf>,

    /// CSV table, if one was written
    pub csv: Option<PathBuf>,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every file written, overlays first.
    pub fn written_files(&self) -> Vec<&PathBuf> {
        self.overlays
            .iter()
            .map(|o| &o.path)
            .chain(self.chart.iter())
            .chain(self.csv.iter())
            .collect()
    }
}
