//! # zonestat
//!
//! Layout statistics for corpora of digitized manuscript pages.
//!
//! Each corpus file is a JSON layout record: a start year and a list of
//! pages, each with its size and typed zones (main text, margins, drop
//! capitals, graphics). zonestat buckets documents by century and produces:
//!
//! - **Overlay images**: every zone of every page of a century stacked onto
//!   one representative canvas, per orientation
//! - **Trend charts**: per-century mean zone counts, tokens or page area,
//!   smoothed with a least-squares polynomial
//! - **CSV tables**: the raw per-century means
//!
//! ## Quick Start
//!
//! ```no_run
//! use zonestat::Zonestat;
//!
//! fn main() -> zonestat::Result<()> {
//!     let report = Zonestat::new().run("corpus", "output")?;
//!     println!("{} files written", report.written_files().len());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod discover;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod smooth;

// Re-export commonly used types
pub use aggregate::{
    Aggregator, AxisFamily, Metric, MetricSeries, MetricSet, OverlayCollector, SmoothedSeries,
    TrendTable,
};
pub use config::Config;
pub use corpus::{CompositeVisitor, CorpusVisitor, ScanStats, Scanner};
pub use discover::discover_files;
pub use error::{Error, Result};
pub use model::{Century, LayoutDocument, Orientation, PageEntry, PageSize, Zone, ZoneType};
pub use parser::{DimensionCheck, ErrorMode, FileOutcome, LayoutParser, ParseOptions};
pub use render::{OverlayOptions, Palette, RunReport, TrendOptions};

use std::fs;
use std::path::Path;

use render::{
    overlay_file_name, render_overlay, render_trend_chart, save_trend_csv, OverlayOutput,
    OverlayPlan,
};

/// Parse a layout record file.
///
/// # Example
///
/// ```no_run
/// use zonestat::parse_file;
///
/// let doc = parse_file("corpus/ms_0001.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<LayoutDocument> {
    LayoutParser::open(path)?.parse()
}

/// Parse a layout record file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<LayoutDocument> {
    LayoutParser::open_with_options(path, options)?.parse()
}

/// Discover and scan every layout record under a directory.
///
/// # Example
///
/// ```no_run
/// use zonestat::{corpus::CenturyCensus, scan_directory, ParseOptions};
///
/// let mut census = CenturyCensus::new();
/// let stats = scan_directory("corpus", "json", &ParseOptions::default(), &mut census)?;
/// println!("{} documents", stats.documents_accepted);
/// # Ok::<(), zonestat::Error>(())
/// ```
pub fn scan_directory<P: AsRef<Path>>(
    root: P,
    extension: &str,
    options: &ParseOptions,
    visitor: &mut dyn CorpusVisitor,
) -> Result<ScanStats> {
    let files = discover_files(root, extension)?;
    let mut scanner = Scanner::new(options.clone());
    scanner.scan_files(&files, visitor)?;
    Ok(scanner.into_stats())
}

/// Builder for a full corpus run.
///
/// # Example
///
/// ```no_run
/// use zonestat::{Metric, MetricSet, TrendOptions, Zonestat};
///
/// let trends = TrendOptions::new()
///     .with_metrics(MetricSet::new().with(Metric::MainZone).with(Metric::PageArea))
///     .with_csv(true);
/// let report = Zonestat::new()
///     .with_trend_options(trends)
///     .overlays(false)
///     .run("corpus", "output")?;
/// # Ok::<(), zonestat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Zonestat {
    extension: String,
    parse_options: ParseOptions,
    overlay_options: OverlayOptions,
    trend_options: TrendOptions,
    overlays: bool,
    trends: bool,
}

impl Zonestat {
    /// Create a builder with default options and both outputs enabled.
    pub fn new() -> Self {
        Self {
            extension: discover::DEFAULT_EXTENSION.to_string(),
            parse_options: ParseOptions::default(),
            overlay_options: OverlayOptions::default(),
            trend_options: TrendOptions::default(),
            overlays: true,
            trends: true,
        }
    }

    /// Create a builder from a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_extension(config.extension.clone())
            .with_options(config.parse.clone())
            .with_overlay_options(config.overlay.clone())
            .with_trend_options(config.trends.clone())
    }

    /// Set the layout record extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set overlay options.
    pub fn with_overlay_options(mut self, options: OverlayOptions) -> Self {
        self.overlay_options = options;
        self
    }

    /// Set trend options.
    pub fn with_trend_options(mut self, options: TrendOptions) -> Self {
        self.trend_options = options;
        self
    }

    /// Enable or disable overlay images.
    pub fn overlays(mut self, enabled: bool) -> Self {
        self.overlays = enabled;
        self
    }

    /// Enable or disable the trend chart and CSV.
    pub fn trends(mut self, enabled: bool) -> Self {
        self.trends = enabled;
        self
    }

    /// Run over every layout record under `input_dir`, writing to `output_dir`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_dir: P, output_dir: Q) -> Result<RunReport> {
        self.run_with_progress(input_dir, output_dir, |_, _, _| {})
    }

    /// Like [`run`](Self::run), calling `on_file(index, total, path)` before
    /// each file is scanned.
    pub fn run_with_progress<P, Q, F>(&self, input_dir: P, output_dir: Q, mut on_file: F) -> Result<RunReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnMut(usize, usize, &Path),
    {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        if self.overlays {
            self.overlay_options.validate()?;
        }
        if self.trends {
            self.trend_options.validate()?;
        }

        let files = discover_files(input_dir, &self.extension)?;
        log::info!(
            "Total .{} files found: {} in {}",
            self.extension.trim_start_matches('.'),
            files.len(),
            input_dir.display()
        );
        fs::create_dir_all(output_dir)?;

        let mut aggregator = Aggregator::new(self.trend_options.metrics.clone());
        let mut collector = OverlayCollector::new();
        let mut scanner = Scanner::new(self.parse_options.clone());
        {
            let mut visitor = CompositeVisitor::new();
            if self.trends {
                visitor = visitor.with_visitor(&mut aggregator);
            }
            if self.overlays {
                visitor = visitor.with_visitor(&mut collector);
            }
            for (index, path) in files.iter().enumerate() {
                on_file(index, files.len(), path);
                scanner.scan_file(path, &mut visitor)?;
            }
        }

        let mut report = RunReport::new();
        report.files_discovered = files.len();

        if self.overlays {
            report.overlays = self.write_overlays(&collector, output_dir)?;
        }

        if self.trends {
            report.pages_aggregated = aggregator.pages_ingested();
            let table = aggregator.finalize();
            let smoothed = table.smooth(self.trend_options.poly_degree)?;

            let chart_path = output_dir.join(&self.trend_options.chart_file);
            if render_trend_chart(&smoothed, &chart_path, &self.trend_options)? {
                report.chart = Some(chart_path);
            }

            if self.trend_options.save_csv {
                let csv_path = output_dir.join(&self.trend_options.csv_file);
                save_trend_csv(&table, &csv_path)?;
                report.csv = Some(csv_path);
            }
        }

        report.stats = scanner.into_stats();
        log::info!(
            "Processed {} documents ({} skipped), {} files written",
            report.stats.documents_accepted,
            report.stats.files_skipped(),
            report.written_files().len()
        );
        Ok(report)
    }

    fn write_overlays(&self, collector: &OverlayCollector, output_dir: &Path) -> Result<Vec<OverlayOutput>> {
        let mut outputs = Vec::with_capacity(collector.group_count());
        for (century, orientation, pages) in collector.groups() {
            let Some(plan) = OverlayPlan::build(pages, &self.overlay_options) else {
                continue;
            };
            if !plan.fits_canvas(&self.overlay_options) {
                log::warn!(
                    "Overlay for century {} ({}) skipped: {:.0}x{:.0} canvas is too large",
                    century,
                    orientation,
                    plan.canvas_width,
                    plan.canvas_height
                );
                continue;
            }
            let path = output_dir.join(overlay_file_name(century, orientation));
            render_overlay(&plan, century, orientation, &path, &self.overlay_options)?;
            log::info!(
                "Overlay for century {} ({}) saved: {}",
                century,
                orientation,
                path.display()
            );
            outputs.push(OverlayOutput {
                century,
                orientation,
                pages: pages.len(),
                path,
            });
        }
        Ok(outputs)
    }
}

impl Default for Zonestat {
    fn default() -> Self {
        Self::new()
    }
}
