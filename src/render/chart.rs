//! Per-century trend chart.
//!
//! Raw means are drawn as points and the polynomial fit as a line. Zone
//! counts use the left axis. Tokens and page area use a right axis that
//! shares the century axis.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::options::{ChartFormat, TrendOptions};
use crate::aggregate::{AxisFamily, Metric, SmoothedSeries};
use crate::error::{Error, Result};

const CAPTION_FONT_SIZE: f64 = 18.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const POINT_RADIUS: u32 = 3;

/// Line and point color of a metric.
pub fn metric_color(metric: Metric) -> RGBColor {
    match metric {
        Metric::MainZone => RGBColor(255, 0, 0),
        Metric::MarginTextZone => RGBColor(255, 165, 0),
        Metric::GraphicZone => RGBColor(255, 105, 180),
        Metric::DropCapitalZone => RGBColor(128, 0, 128),
        Metric::TotalZones => RGBColor(165, 42, 42),
        Metric::Tokens => RGBColor(0, 0, 0),
        Metric::PageArea => RGBColor(0, 0, 128),
    }
}

/// Chart title derived from the secondary-axis metrics present.
pub fn default_title(series: &[SmoothedSeries]) -> String {
    let has = |m: Metric| series.iter().any(|s| s.metric == m && !s.points.is_empty());
    let subject = match (has(Metric::Tokens), has(Metric::PageArea)) {
        (true, true) => "Zones, Tokens and Page Area",
        (true, false) => "Zones and Tokens",
        (false, true) => "Zones and Page Area",
        (false, false) => "Zones",
    };
    format!("{} per Century (Polyn. reg.)", subject)
}

fn secondary_description(series: &[&SmoothedSeries]) -> &'static str {
    let tokens = series.iter().any(|s| s.metric == Metric::Tokens);
    let area = series.iter().any(|s| s.metric == Metric::PageArea);
    match (tokens, area) {
        (true, true) => "Tokens / area per page (avg)",
        (false, true) => "Page area (avg)",
        _ => "Tokens/page (avg)",
    }
}

/// Draw the trend chart to `path`, as PNG or SVG depending on the extension.
///
/// Returns `Ok(false)` without writing anything when no series has points.
pub fn render_trend_chart(
    series: &[SmoothedSeries],
    path: &Path,
    options: &TrendOptions,
) -> Result<bool> {
    let format = ChartFormat::from_path(path)?;
    let non_empty: Vec<&SmoothedSeries> = series.iter().filter(|s| !s.points.is_empty()).collect();
    if non_empty.is_empty() {
        log::info!("No data to plot, {} not written", path.display());
        return Ok(false);
    }

    let title = options
        .title
        .clone()
        .unwrap_or_else(|| default_title(series));
    let size = (options.chart_width, options.chart_height);

    match format {
        ChartFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_trend_chart(&root, &non_empty, &title)?;
            root.present().map_err(Error::render)?;
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_trend_chart(&root, &non_empty, &title)?;
            root.present().map_err(Error::render)?;
        }
    }

    log::info!("Trend chart written to {}", path.display());
    Ok(true)
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn draw_trend_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[&SmoothedSeries],
    title: &str,
) -> Result<()> {
    root.fill(&WHITE).map_err(Error::render)?;

    let (primary, secondary): (Vec<&SmoothedSeries>, Vec<&SmoothedSeries>) = series
        .iter()
        .copied()
        .partition(|s| s.metric.family() == AxisFamily::ZoneCount);

    let x_range = century_range(series);
    let century_count = (x_range.end - x_range.start).round() as usize + 1;

    let mut chart = ChartBuilder::on(root)
        .caption(title, font(CAPTION_FONT_SIZE))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .right_y_label_area_size(if secondary.is_empty() { 0 } else { 60 })
        .build_cartesian_2d(x_range.clone(), value_range(&primary))
        .map_err(Error::render)?
        .set_secondary_coord(x_range, value_range(&secondary));

    chart
        .configure_mesh()
        .x_desc("Century")
        .y_desc("Zones/page (avg)")
        .x_labels(century_count.min(20))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .label_style(font(LABEL_FONT_SIZE))
        .draw()
        .map_err(Error::render)?;

    if !secondary.is_empty() {
        chart
            .configure_secondary_axes()
            .y_desc(secondary_description(&secondary))
            .label_style(font(LABEL_FONT_SIZE))
            .draw()
            .map_err(Error::render)?;
    }

    for s in &primary {
        let color = metric_color(s.metric);
        chart
            .draw_series(s.raw().map(|p| Circle::new(p, POINT_RADIUS, color.mix(0.6).filled())))
            .map_err(Error::render)?;
        chart
            .draw_series(LineSeries::new(s.curve(), color.stroke_width(2)))
            .map_err(Error::render)?
            .label(s.metric.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    for s in &secondary {
        let color = metric_color(s.metric);
        chart
            .draw_secondary_series(s.raw().map(|p| Circle::new(p, POINT_RADIUS, color.mix(0.6).filled())))
            .map_err(Error::render)?;
        chart
            .draw_secondary_series(LineSeries::new(s.curve(), color.stroke_width(2)))
            .map_err(Error::render)?
            .label(format!("{} (right axis)", s.metric.label()))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.5))
        .label_font(font(LABEL_FONT_SIZE))
        .draw()
        .map_err(Error::render)?;

    Ok(())
}

/// Century axis range with half a century of padding on each side.
fn century_range(series: &[&SmoothedSeries]) -> Range<f64> {
    let xs: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.century.as_f64()))
        .collect();
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() {
        (lo - 0.5)..(hi + 0.5)
    } else {
        0.0..1.0
    }
}

/// Value axis range covering zero, raw means and the fitted curve.
fn value_range(series: &[&SmoothedSeries]) -> Range<f64> {
    let lo = series
        .iter()
        .filter_map(|s| s.min_value())
        .fold(0.0, f64::min);
    let hi = series
        .iter()
        .filter_map(|s| s.max_value())
        .fold(f64::NEG_INFINITY, f64::max);
    if !hi.is_finite() || hi <= lo {
        return lo..(lo + 1.0);
    }
    lo..(hi + (hi - lo) * 0.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SeriesPoint;
    use crate::model::Century;

    fn smoothed(metric: Metric, points: &[(u32, f64)]) -> SmoothedSeries {
        SmoothedSeries {
            metric,
            points: points
                .iter()
                .map(|&(c, mean)| SeriesPoint {
                    century: Century(c),
                    mean,
                })
                .collect(),
            fitted: points.iter().map(|&(_, mean)| mean).collect(),
        }
    }

    #[test]
    fn test_default_title() {
        let zones = smoothed(Metric::MainZone, &[(9, 1.0)]);
        let tokens = smoothed(Metric::Tokens, &[(9, 100.0)]);
        let area = smoothed(Metric::PageArea, &[(9, 5000.0)]);

        assert_eq!(
            default_title(&[zones.clone(), tokens.clone()]),
            "Zones and Tokens per Century (Polyn. reg.)"
        );
        assert_eq!(
            default_title(&[zones.clone(), area.clone()]),
            "Zones and Page Area per Century (Polyn. reg.)"
        );
        assert_eq!(default_title(&[zones]), "Zones per Century (Polyn. reg.)");
        assert_eq!(
            default_title(&[tokens, area]),
            "Zones, Tokens and Page Area per Century (Polyn. reg.)"
        );
    }

    #[test]
    fn test_ranges() {
        let a = smoothed(Metric::MainZone, &[(9, 2.0), (14, 10.0)]);
        let b = smoothed(Metric::MarginTextZone, &[(11, 1.0)]);
        let series = [&a, &b];

        assert_eq!(century_range(&series), 8.5..14.5);
        let range = value_range(&series);
        assert_eq!(range.start, 0.0);
        assert!((range.end - 11.0).abs() < 1e-12);
        assert_eq!(value_range(&[]), 0.0..1.0);
    }

    #[test]
    fn test_empty_series_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.png");
        let empty = smoothed(Metric::MainZone, &[]);

        let written = render_trend_chart(&[empty], &path, &TrendOptions::default()).unwrap();
        assert!(!written);
        assert!(!path.exists());
    }

    #[test]
    fn test_render_dual_axis_png_and_svg() {
        let dir = tempfile::tempdir().unwrap();
        let centuries = 9..=15u32;
        let main: Vec<(u32, f64)> = centuries.clone().map(|c| (c, c as f64 * 0.5)).collect();
        let tokens: Vec<(u32, f64)> = centuries.map(|c| (c, 100.0 + c as f64 * 10.0)).collect();
        let series = [
            smoothed(Metric::MainZone, &main),
            smoothed(Metric::Tokens, &tokens),
        ];

        let png = dir.path().join("graph.png");
        assert!(render_trend_chart(&series, &png, &TrendOptions::default()).unwrap());
        let bytes = std::fs::read(&png).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));

        let svg = dir.path().join("graph.svg");
        let options = TrendOptions::default().with_chart_file("graph.svg");
        assert!(render_trend_chart(&series, &svg, &options).unwrap());
        let text = std::fs::read_to_string(&svg).unwrap();
        assert!(text.contains("<svg"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let series = smoothed(Metric::MainZone, &[(9, 1.0)]);
        let result = render_trend_chart(&[series], &dir.path().join("graph.gif"), &TrendOptions::default());
        assert!(matches!(result, Err(Error::Render(_))));
    }
}
