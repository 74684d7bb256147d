//! Document-level and page-level types.

use super::{lenient, Century, Zone, ZoneRect};
use crate::parser::DimensionCheck;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A parsed layout record describing one manuscript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Raw start year (number or numeric-leading string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<Value>,

    /// Page image entries, in document order
    #[serde(default, deserialize_with = "lenient::entries")]
    pub files: Vec<PageEntry>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw start year.
    pub fn with_start_year(mut self, year: impl Into<Value>) -> Self {
        self.start_year = Some(year.into());
        self
    }

    /// Add a page entry.
    pub fn add_page(&mut self, page: PageEntry) {
        self.files.push(page);
    }

    /// Century bucket of the document, if its start year is usable.
    pub fn century(&self) -> Option<Century> {
        Century::from_raw(self.start_year.as_ref())
    }

    /// Get the number of page entries.
    pub fn page_count(&self) -> usize {
        self.files.len()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// One page image with its zones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageEntry {
    /// Page size `[width, height]`; empty when the record omits it
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub wh: Vec<f64>,

    /// Zones on the page
    #[serde(default, deserialize_with = "lenient::entries")]
    pub zones: Vec<Zone>,
}

impl PageEntry {
    /// Create a page with the given dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            wh: vec![width, height],
            zones: Vec::new(),
        }
    }

    /// Add a zone to the page.
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Validated page size under the given check.
    pub fn size(&self, check: DimensionCheck) -> Option<PageSize> {
        match self.wh.as_slice() {
            &[w, h] if check.accepts(w) && check.accepts(h) => Some(PageSize {
                width: w,
                height: h,
            }),
            _ => None,
        }
    }

    /// Geometry of every zone that has a valid rectangle.
    pub fn zone_rects(&self) -> Vec<ZoneRect> {
        self.zones.iter().filter_map(Zone::rect).collect()
    }

    /// Check if the page holds at least one anchor zone.
    pub fn has_anchor(&self) -> bool {
        self.zones.iter().any(|z| z.zone_type.is_anchor())
    }
}

/// Validated page dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Orientation derived from the width/height comparison.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Page area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Page orientation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Height >= width
    Portrait,
    /// Width > height
    Landscape,
}

impl Orientation {
    /// Both orientations, portrait first.
    pub const ALL: [Orientation; 2] = [Orientation::Portrait, Orientation::Landscape];

    /// Lowercase name used in file names and titles.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }

    /// Weight applied to every metric contributed by a page of this orientation.
    pub fn metric_weight(&self) -> f64 {
        match self {
            Orientation::Portrait => 1.0,
            Orientation::Landscape => 0.5,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
