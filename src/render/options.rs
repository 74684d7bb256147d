//! Rendering options and configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::MetricSet;
use crate::error::{Error, Result};
use crate::model::ZoneType;

/// One palette entry: a zone type tag and its RGB color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Zone type tag (e.g., "MainZone")
    pub zone_type: String,
    /// RGB color
    pub color: [u8; 3],
}

impl PaletteEntry {
    /// Create a palette entry.
    pub fn new(zone_type: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            zone_type: zone_type.into(),
            color,
        }
    }
}

/// Fixed mapping from zone type to outline color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Entries in legend order
    pub entries: Vec<PaletteEntry>,
    /// Color for types missing from the palette
    pub fallback: [u8; 3],
}

impl Palette {
    /// Color of a zone type, or the fallback.
    pub fn color(&self, zone_type: &ZoneType) -> [u8; 3] {
        self.entries
            .iter()
            .find(|e| e.zone_type == zone_type.as_str())
            .map(|e| e.color)
            .unwrap_or(self.fallback)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: vec![
                PaletteEntry::new("MainZone", [0, 0, 255]),
                PaletteEntry::new("MarginTextZone", [0, 128, 0]),
                PaletteEntry::new("DropCapitalZone", [255, 0, 0]),
                PaletteEntry::new("DefaultLine", [128, 0, 128]),
                PaletteEntry::new("Other", [128, 128, 128]),
            ],
            fallback: [128, 128, 128],
        }
    }
}

/// Options for overlay images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Zone type colors
    pub palette: Palette,

    /// Opacity of a zone type with zero relative frequency
    pub alpha_max: f64,

    /// Upper line width bound, in points
    pub line_width_max: f64,

    /// Lower line width bound, in points
    pub line_width_min: f64,

    /// Exponential decay coefficient applied to relative frequency
    pub decay: f64,

    /// Pixels per inch used to turn line widths into pixels
    pub dpi: f64,

    /// Canvas pixels per page unit
    pub pixel_scale: f64,

    /// Draw the palette legend
    pub legend: bool,

    /// Draw the title band
    pub title: bool,
}

impl OverlayOptions {
    /// Create new overlay options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the decay coefficient.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Set the maximum opacity.
    pub fn with_alpha_max(mut self, alpha: f64) -> Self {
        self.alpha_max = alpha;
        self
    }

    /// Set the line width bounds.
    pub fn with_line_widths(mut self, min: f64, max: f64) -> Self {
        self.line_width_min = min;
        self.line_width_max = max;
        self
    }

    /// Set canvas pixels per page unit.
    pub fn with_pixel_scale(mut self, scale: f64) -> Self {
        self.pixel_scale = scale;
        self
    }

    /// Enable or disable the legend.
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// Enable or disable the title band.
    pub fn with_title(mut self, title: bool) -> Self {
        self.title = title;
        self
    }

    /// Opacity for a zone type occurring `frequency` times out of `max_frequency`.
    pub fn opacity(&self, frequency: usize, max_frequency: usize) -> f64 {
        self.alpha_max * self.decay_factor(frequency, max_frequency)
    }

    /// Line width in points for a zone type occurring `frequency` times.
    pub fn line_width(&self, frequency: usize, max_frequency: usize) -> f64 {
        (self.line_width_max * self.decay_factor(frequency, max_frequency))
            .max(self.line_width_min)
    }

    /// Stroke width in whole pixels, at least one.
    pub fn stroke_pixels(&self, line_width: f64) -> u32 {
        (line_width * self.dpi / 72.0).round().max(1.0) as u32
    }

    fn decay_factor(&self, frequency: usize, max_frequency: usize) -> f64 {
        let relative = frequency as f64 / max_frequency.max(1) as f64;
        (-self.decay * relative).exp()
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha_max > 0.0 && self.alpha_max <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "alpha_max must be in (0, 1], got {}",
                self.alpha_max
            )));
        }
        if !(self.line_width_min >= 0.0 && self.line_width_min <= self.line_width_max) {
            return Err(Error::InvalidConfig(format!(
                "line widths must satisfy 0 <= min <= max, got {} and {}",
                self.line_width_min, self.line_width_max
            )));
        }
        if !(self.decay >= 0.0 && self.decay.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "decay must be finite and non-negative, got {}",
                self.decay
            )));
        }
        if !(self.dpi > 0.0 && self.pixel_scale > 0.0) {
            return Err(Error::InvalidConfig(
                "dpi and pixel_scale must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            alpha_max: 0.3,
            line_width_max: 1.0,
            line_width_min: 0.0001,
            decay: 2.0,
            dpi: 200.0,
            pixel_scale: 1.0,
            legend: true,
            title: true,
        }
    }
}

/// Options for the trend chart and CSV table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendOptions {
    /// Metrics to aggregate and plot
    pub metrics: MetricSet,

    /// Polynomial degree of the smoothing fit
    pub poly_degree: usize,

    /// Chart file name, relative to the output directory
    pub chart_file: PathBuf,

    /// Chart width in pixels
    pub chart_width: u32,

    /// Chart height in pixels
    pub chart_height: u32,

    /// Custom chart title
    pub title: Option<String>,

    /// Write the per-century table as CSV
    pub save_csv: bool,

    /// CSV file name, relative to the output directory
    pub csv_file: PathBuf,
}

impl TrendOptions {
    /// Create new trend options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set tracked metrics.
    pub fn with_metrics(mut self, metrics: MetricSet) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the polynomial degree.
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.poly_degree = degree;
        self
    }

    /// Set the chart file name.
    pub fn with_chart_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.chart_file = file.into();
        self
    }

    /// Set the chart size in pixels.
    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }

    /// Set a custom chart title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable CSV output.
    pub fn with_csv(mut self, save: bool) -> Self {
        self.save_csv = save;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(Error::InvalidConfig("no metric tracked".into()));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(Error::InvalidConfig("chart size must be positive".into()));
        }
        ChartFormat::from_path(&self.chart_file).map(|_| ())
    }
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            metrics: MetricSet::default(),
            poly_degree: 6,
            chart_file: PathBuf::from("graph.png"),
            chart_width: 650,
            chart_height: 660,
            title: None,
            save_csv: false,
            csv_file: PathBuf::from("data.csv"),
        }
    }
}

/// Image format, chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    /// PNG bitmap
    Png,
    /// SVG vector image
    Svg,
}

impl ChartFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(ChartFormat::Png),
            Some("svg") => Ok(ChartFormat::Svg),
            _ => Err(Error::Render(format!(
                "unsupported image format: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Metric;

    #[test]
    fn test_palette_lookup() {
        let palette = Palette::default();
        assert_eq!(palette.color(&ZoneType::MainZone), [0, 0, 255]);
        assert_eq!(palette.color(&ZoneType::GraphicZone), [128, 128, 128]);
        assert_eq!(palette.color(&ZoneType::from("RunningTitleZone")), palette.fallback);
    }

    #[test]
    fn test_max_frequency_style() {
        let options = OverlayOptions::default();
        let expected_alpha = 0.3 * (-2.0f64).exp();
        let expected_lw = (1.0 * (-2.0f64).exp()).max(0.0001);
        assert!((options.opacity(40, 40) - expected_alpha).abs() < 1e-12);
        assert!((options.line_width(40, 40) - expected_lw).abs() < 1e-12);
    }

    #[test]
    fn test_rare_types_stand_out() {
        let options = OverlayOptions::default();
        assert!(options.opacity(1, 100) > options.opacity(100, 100));
        assert!(options.line_width(1, 100) > options.line_width(100, 100));
        assert_eq!(options.line_width(100, 100).max(0.0001), options.line_width(100, 100));
    }

    #[test]
    fn test_line_width_floor() {
        let options = OverlayOptions::default().with_decay(50.0);
        assert_eq!(options.line_width(10, 10), 0.0001);
        assert_eq!(options.stroke_pixels(0.0001), 1);
        assert_eq!(options.stroke_pixels(1.0), 3);
    }

    #[test]
    fn test_overlay_validate() {
        assert!(OverlayOptions::default().validate().is_ok());
        assert!(OverlayOptions::default().with_alpha_max(1.5).validate().is_err());
        assert!(OverlayOptions::default().with_line_widths(2.0, 1.0).validate().is_err());
        assert!(OverlayOptions::default().with_decay(-1.0).validate().is_err());
    }

    #[test]
    fn test_trend_options_builder() {
        let options = TrendOptions::new()
            .with_metrics(MetricSet::new().with(Metric::PageArea))
            .with_degree(3)
            .with_chart_file("graph.svg")
            .with_csv(true);

        assert_eq!(options.poly_degree, 3);
        assert!(options.save_csv);
        assert!(options.validate().is_ok());
        assert!(TrendOptions::new().with_chart_file("graph.pdf").validate().is_err());
        assert!(TrendOptions::new().with_metrics(MetricSet::new()).validate().is_err());
    }

    #[test]
    fn test_chart_format() {
        assert_eq!(ChartFormat::from_path(Path::new("a/graph.PNG")).unwrap(), ChartFormat::Png);
        assert_eq!(ChartFormat::from_path(Path::new("graph.svg")).unwrap(), ChartFormat::Svg);
        assert!(ChartFormat::from_path(Path::new("graph")).is_err());
    }
}
