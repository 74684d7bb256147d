//! Page geometry grouped by century and orientation.

use std::collections::BTreeMap;

use crate::corpus::CorpusVisitor;
use crate::model::{Century, Orientation, PageEntry, PageSize, ZoneRect};

/// Geometry of one page kept for overlay rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPage {
    /// Page size in its own coordinate space
    pub size: PageSize,
    /// Valid zone rectangles
    pub zones: Vec<ZoneRect>,
}

impl OverlayPage {
    /// Build from a page, keeping only zones with valid geometry.
    ///
    /// Returns `None` when no zone survives.
    pub fn from_page(page: &PageEntry, size: PageSize) -> Option<Self> {
        let zones = page.zone_rects();
        (!zones.is_empty()).then_some(Self { size, zones })
    }
}

/// Collects overlay pages per (century, orientation).
#[derive(Debug, Clone, Default)]
pub struct OverlayCollector {
    groups: BTreeMap<(Century, Orientation), Vec<OverlayPage>>,
}

impl OverlayCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to its group. Pages without valid zones are ignored.
    pub fn add_page(&mut self, century: Century, page: &PageEntry, size: PageSize) -> bool {
        match OverlayPage::from_page(page, size) {
            Some(overlay_page) => {
                self.groups
                    .entry((century, size.orientation()))
                    .or_default()
                    .push(overlay_page);
                true
            }
            None => false,
        }
    }

    /// Pages of one group.
    pub fn pages(&self, century: Century, orientation: Orientation) -> &[OverlayPage] {
        self.groups
            .get(&(century, orientation))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty groups in (century, orientation) order.
    pub fn groups(&self) -> impl Iterator<Item = (Century, Orientation, &[OverlayPage])> + '_ {
        self.groups
            .iter()
            .map(|(&(century, orientation), pages)| (century, orientation, pages.as_slice()))
    }

    /// Number of non-empty groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Check if no page was collected.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl CorpusVisitor for OverlayCollector {
    fn visit_page(&mut self, century: Century, page: &PageEntry, size: PageSize) {
        if !self.add_page(century, page, size) {
            log::trace!("Century {}: page without valid zones left out of overlay", century);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Zone;

    #[test]
    fn test_groups_by_orientation() {
        let mut collector = OverlayCollector::new();
        let portrait = PageEntry::new(1000.0, 1500.0).with_zone(Zone::new("MainZone", 1.0, 1.0, 5.0, 5.0));
        let landscape = PageEntry::new(1500.0, 1000.0).with_zone(Zone::new("MainZone", 1.0, 1.0, 5.0, 5.0));

        assert!(collector.add_page(Century(9), &portrait, PageSize::new(1000.0, 1500.0)));
        assert!(collector.add_page(Century(9), &landscape, PageSize::new(1500.0, 1000.0)));
        assert!(collector.add_page(Century(9), &portrait, PageSize::new(1000.0, 1500.0)));

        assert_eq!(collector.group_count(), 2);
        assert_eq!(collector.pages(Century(9), Orientation::Portrait).len(), 2);
        assert_eq!(collector.pages(Century(9), Orientation::Landscape).len(), 1);
        assert!(collector.pages(Century(10), Orientation::Portrait).is_empty());
    }

    #[test]
    fn test_invalid_zones_dropped() {
        let mut collector = OverlayCollector::new();
        let page = PageEntry::new(100.0, 100.0)
            .with_zone(Zone::new("MainZone", 0.0, 0.0, 0.0, 5.0))
            .with_zone(Zone::new("GraphicZone", 0.0, 0.0, 5.0, 5.0));
        collector.visit_page(Century(11), &page, PageSize::new(100.0, 100.0));
        assert_eq!(collector.pages(Century(11), Orientation::Portrait)[0].zones.len(), 1);

        let empty = PageEntry::new(100.0, 100.0).with_zone(Zone::new("MainZone", 0.0, 0.0, 0.0, 0.0));
        assert!(!collector.add_page(Century(12), &empty, PageSize::new(100.0, 100.0)));
        assert_eq!(collector.group_count(), 1);
    }
}
