//! Integration tests for the visitor pattern.

use std::fs;
use std::path::{Path, PathBuf};

use zonestat::aggregate::{Aggregator, OverlayCollector};
use zonestat::corpus::CenturyCensus;
use zonestat::parser::SkipReason;
use zonestat::{
    Century, CompositeVisitor, CorpusVisitor, LayoutDocument, Metric, MetricSet, Orientation,
    PageEntry, PageSize, ParseOptions, Scanner,
};

/// Custom visitor that records what it was handed.
#[derive(Default)]
struct RecordingVisitor {
    documents: Vec<(PathBuf, Century)>,
    pages: Vec<(Century, Orientation)>,
    unreadable: usize,
    invalid_years: usize,
}

impl CorpusVisitor for RecordingVisitor {
    fn visit_document(&mut self, path: &Path, century: Century, _document: &LayoutDocument) {
        self.documents.push((path.to_path_buf(), century));
    }

    fn visit_page(&mut self, century: Century, _page: &PageEntry, size: PageSize) {
        self.pages.push((century, size.orientation()));
    }

    fn visit_skip(&mut self, _path: &Path, reason: &SkipReason) {
        match reason {
            SkipReason::Unreadable(_) => self.unreadable += 1,
            SkipReason::InvalidYear => self.invalid_years += 1,
        }
    }
}

/// Visitor relying on every default method.
struct SilentVisitor;

impl CorpusVisitor for SilentVisitor {}

fn corpus() -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let records = [
        (
            "a.json",
            r#"{"start_year": "1210", "files": [
                {"wh": [100, 150], "zones": [{"type": "MainZone", "xy": [5, 5], "wh": [80, 120]}]},
                {"wh": [150, 100], "zones": [{"type": "MarginTextZone", "xy": [5, 5], "wh": [10, 20]}]}
            ]}"#,
        ),
        ("b.json", r#"{"start_year": "s.d.", "files": []}"#),
        ("c.json", "not json"),
    ];
    let paths = records
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

#[test]
fn test_default_visitor_methods_do_nothing() {
    let (_dir, paths) = corpus();
    let mut scanner = Scanner::new(ParseOptions::default());
    scanner.scan_files(&paths, &mut SilentVisitor).unwrap();
    assert_eq!(scanner.stats().files_seen, 3);
}

#[test]
fn test_recording_visitor_sees_every_event() {
    let (_dir, paths) = corpus();
    let mut visitor = RecordingVisitor::default();
    let mut scanner = Scanner::new(ParseOptions::default());
    scanner.scan_files(&paths, &mut visitor).unwrap();

    assert_eq!(visitor.documents, vec![(paths[0].clone(), Century(13))]);
    assert_eq!(
        visitor.pages,
        vec![
            (Century(13), Orientation::Portrait),
            (Century(13), Orientation::Landscape)
        ]
    );
    assert_eq!(visitor.unreadable, 1);
    assert_eq!(visitor.invalid_years, 1);
}

#[test]
fn test_composite_feeds_aggregator_and_collector_in_one_pass() {
    let (_dir, paths) = corpus();
    let mut aggregator = Aggregator::new(MetricSet::new().with(Metric::MainZone).with(Metric::MarginTextZone));
    let mut collector = OverlayCollector::new();
    let mut census = CenturyCensus::new();
    let mut scanner = Scanner::new(ParseOptions::default());

    {
        let mut composite = CompositeVisitor::new()
            .with_visitor(&mut aggregator)
            .with_visitor(&mut collector)
            .with_visitor(&mut census);
        assert_eq!(composite.len(), 3);
        scanner.scan_files(&paths, &mut composite).unwrap();
    }

    // Landscape page has no MainZone: overlay only
    assert_eq!(aggregator.pages_ingested(), 1);
    assert_eq!(aggregator.pages_without_anchor(), 1);
    assert_eq!(collector.group_count(), 2);
    assert_eq!(collector.pages(Century(13), Orientation::Landscape).len(), 1);
    assert_eq!(census.rows(), vec![(Century(13), 1, 2)]);

    let table = aggregator.finalize();
    assert_eq!(table.get(Metric::MainZone).unwrap().mean_at(Century(13)), Some(1.0));
    assert_eq!(table.get(Metric::MarginTextZone).unwrap().mean_at(Century(13)), Some(0.0));
}

#[test]
fn test_empty_composite_is_valid() {
    let (_dir, paths) = corpus();
    let mut composite = CompositeVisitor::new();
    assert!(composite.is_empty());

    let mut scanner = Scanner::new(ParseOptions::default());
    scanner.scan_files(&paths, &mut composite).unwrap();
    assert_eq!(scanner.stats().pages_accepted, 2);
}
