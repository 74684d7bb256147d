//! Representative page overlays.
//!
//! All pages of a (century, orientation) group are rescaled onto one canvas
//! of the group's mean page size and their zone outlines are stacked. Common
//! zone types fade (low opacity, thin lines) so that rare ones stand out.

use std::collections::BTreeMap;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::options::{OverlayOptions, Palette};
use crate::aggregate::OverlayPage;
use crate::error::{Error, Result};
use crate::model::{Century, Orientation, ZoneRect, ZoneType};

const TITLE_BAND: u32 = 40;
const TITLE_FONT_SIZE: f64 = 20.0;
const LEGEND_FONT_SIZE: f64 = 12.0;
const LEGEND_SWATCH: i32 = 20;
const LEGEND_PAD: i32 = 6;
const LEGEND_MARGIN: i32 = 10;

/// Largest bitmap an overlay may allocate, title band included.
pub const MAX_OVERLAY_PIXELS: u64 = 100_000_000;

/// One zone outline placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedZone {
    /// Rectangle in canvas units
    pub rect: ZoneRect,
    /// Outline color
    pub color: [u8; 3],
    /// Outline opacity
    pub alpha: f64,
    /// Outline width in points
    pub line_width: f64,
}

/// Everything needed to draw one overlay image.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    /// Mean page width
    pub canvas_width: f64,
    /// Mean page height
    pub canvas_height: f64,
    /// Occurrences of each zone type in the group
    pub frequencies: BTreeMap<ZoneType, usize>,
    /// Largest entry of `frequencies`
    pub max_frequency: usize,
    /// Zone outlines in drawing order
    pub zones: Vec<PlannedZone>,
}

impl OverlayPlan {
    /// Plan the overlay of a group of pages.
    ///
    /// Returns `None` for an empty group.
    pub fn build(pages: &[OverlayPage], options: &OverlayOptions) -> Option<Self> {
        if pages.is_empty() {
            return None;
        }

        let n = pages.len() as f64;
        let canvas_width = pages.iter().map(|p| p.size.width).sum::<f64>() / n;
        let canvas_height = pages.iter().map(|p| p.size.height).sum::<f64>() / n;

        let mut frequencies: BTreeMap<ZoneType, usize> = BTreeMap::new();
        for rect in pages.iter().flat_map(|p| &p.zones) {
            *frequencies.entry(rect.zone_type.clone()).or_default() += 1;
        }
        let max_frequency = frequencies.values().copied().max().unwrap_or(0);

        let mut zones = Vec::new();
        for page in pages {
            let scale_x = canvas_width / page.size.width;
            let scale_y = canvas_height / page.size.height;
            for rect in &page.zones {
                let frequency = frequencies.get(&rect.zone_type).copied().unwrap_or(0);
                zones.push(PlannedZone {
                    rect: rect.scaled(scale_x, scale_y),
                    color: options.palette.color(&rect.zone_type),
                    alpha: options.opacity(frequency, max_frequency),
                    line_width: options.line_width(frequency, max_frequency),
                });
            }
        }

        Some(Self {
            canvas_width,
            canvas_height,
            frequencies,
            max_frequency,
            zones,
        })
    }

    /// Occurrences of a zone type.
    pub fn frequency(&self, zone_type: &ZoneType) -> usize {
        self.frequencies.get(zone_type).copied().unwrap_or(0)
    }

    /// Canvas size in pixels.
    pub fn pixel_size(&self, options: &OverlayOptions) -> (u32, u32) {
        let to_px = |v: f64| (v * options.pixel_scale).round().max(1.0) as u32;
        (to_px(self.canvas_width), to_px(self.canvas_height))
    }

    /// Check if the rendered image stays within [`MAX_OVERLAY_PIXELS`].
    pub fn fits_canvas(&self, options: &OverlayOptions) -> bool {
        let (width, height) = self.pixel_size(options);
        image_pixels(width, height, options) <= MAX_OVERLAY_PIXELS
    }
}

fn title_band(options: &OverlayOptions) -> u32 {
    if options.title {
        TITLE_BAND
    } else {
        0
    }
}

fn image_pixels(width: u32, height: u32, options: &OverlayOptions) -> u64 {
    u64::from(width) * (u64::from(height) + u64::from(title_band(options)))
}

/// File name of the overlay of one group.
pub fn overlay_file_name(century: Century, orientation: Orientation) -> String {
    format!(
        "page_type_overlay_century_{}_{}.png",
        century.get(),
        orientation.as_str()
    )
}

/// Title of the overlay of one group.
pub fn overlay_title(century: Century, orientation: Orientation) -> String {
    format!(
        "Representative Page Overlay - Century {} ({})",
        century.get(),
        orientation.as_str()
    )
}

/// Draw a planned overlay to a PNG file.
///
/// Fails with [`Error::Render`] when the image would exceed
/// [`MAX_OVERLAY_PIXELS`].
pub fn render_overlay(
    plan: &OverlayPlan,
    century: Century,
    orientation: Orientation,
    path: &Path,
    options: &OverlayOptions,
) -> Result<()> {
    let (width, height) = plan.pixel_size(options);
    let pixels = image_pixels(width, height, options);
    if pixels > MAX_OVERLAY_PIXELS {
        return Err(Error::Render(format!(
            "overlay of {}x{} px exceeds the {} pixel limit",
            width, height, MAX_OVERLAY_PIXELS
        )));
    }
    let band = title_band(options);

    let root = BitMapBackend::new(path, (width, height + band)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;

    let body = if options.title {
        let (top, body) = root.split_vertically(band);
        top.titled(&overlay_title(century, orientation), font(TITLE_FONT_SIZE))
            .map_err(Error::render)?;
        body
    } else {
        root.clone()
    };

    draw_zones(&body, plan, options)?;
    if options.legend {
        draw_legend(&body, &options.palette)?;
    }

    root.present().map_err(Error::render)?;
    log::debug!(
        "Overlay for century {} ({}) written to {}",
        century,
        orientation.as_str(),
        path.display()
    );
    Ok(())
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn draw_zones<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plan: &OverlayPlan,
    options: &OverlayOptions,
) -> Result<()> {
    let (px_width, px_height) = area.dim_in_pixel();
    let sx = px_width as f64 / plan.canvas_width;
    let sy = px_height as f64 / plan.canvas_height;
    let to_px = |x: f64, y: f64| ((x * sx).round() as i32, (y * sy).round() as i32);

    for zone in &plan.zones {
        let [r, g, b] = zone.color;
        let style = ShapeStyle {
            color: RGBColor(r, g, b).mix(zone.alpha),
            filled: false,
            stroke_width: options.stroke_pixels(zone.line_width),
        };
        let rect = &zone.rect;
        let corners = [
            to_px(rect.x, rect.y),
            to_px(rect.x + rect.width, rect.y + rect.height),
        ];
        area.draw(&Rectangle::new(corners, style))
            .map_err(Error::render)?;
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, palette: &Palette) -> Result<()> {
    if palette.entries.is_empty() {
        return Ok(());
    }
    let style = font(LEGEND_FONT_SIZE).color(&BLACK);

    let mut label_width = 0;
    for entry in &palette.entries {
        let (w, _) = area
            .estimate_text_size(&entry.zone_type, &style)
            .map_err(Error::render)?;
        label_width = label_width.max(w as i32);
    }

    let row = LEGEND_FONT_SIZE as i32 + LEGEND_PAD;
    let box_width = LEGEND_SWATCH + label_width + 3 * LEGEND_PAD;
    let box_height = row * palette.entries.len() as i32 + LEGEND_PAD;
    let (px_width, _) = area.dim_in_pixel();
    let x0 = px_width as i32 - box_width - LEGEND_MARGIN;
    let y0 = LEGEND_MARGIN;
    let corners = [(x0, y0), (x0 + box_width, y0 + box_height)];

    area.draw(&Rectangle::new(corners, WHITE.mix(0.8).filled()))
        .map_err(Error::render)?;
    area.draw(&Rectangle::new(corners, BLACK.mix(0.5).stroke_width(1)))
        .map_err(Error::render)?;

    for (i, entry) in palette.entries.iter().enumerate() {
        let y = y0 + LEGEND_PAD + i as i32 * row + row / 2;
        let [r, g, b] = entry.color;
        let swatch = vec![(x0 + LEGEND_PAD, y), (x0 + LEGEND_PAD + LEGEND_SWATCH, y)];
        area.draw(&PathElement::new(swatch, RGBColor(r, g, b).stroke_width(2)))
            .map_err(Error::render)?;
        area.draw_text(
            &entry.zone_type,
            &style,
            (x0 + 2 * LEGEND_PAD + LEGEND_SWATCH, y - LEGEND_FONT_SIZE as i32 / 2),
        )
        .map_err(Error::render)?;
    }
    Ok(())
}
