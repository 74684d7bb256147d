//! Rendering module for overlay images, trend charts and CSV tables.

mod chart;
mod csv;
mod options;
mod overlay;
mod result;

pub use self::csv::{save_trend_csv, write_trend_csv};
pub use chart::{default_title, metric_color, render_trend_chart};
pub use options::{ChartFormat, OverlayOptions, Palette, PaletteEntry, TrendOptions};
pub use overlay::{
    overlay_file_name, overlay_title, render_overlay, OverlayPlan, PlannedZone, MAX_OVERLAY_PIXELS,
};
pub use result::{OverlayOutput, RunReport};
