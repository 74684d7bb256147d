//! Visitor pattern for consuming a scanned corpus.
//!
//! The scanner hands every accepted document and each of its valid pages to
//! a [`CorpusVisitor`]. Aggregators implement the methods they need; all of
//! them default to doing nothing.
//!
//! # Example
//!
//! ```
//! use zonestat::corpus::CorpusVisitor;
//! use zonestat::model::{Century, PageEntry, PageSize};
//!
//! #[derive(Default)]
//! struct PageCounter(usize);
//!
//! impl CorpusVisitor for PageCounter {
//!     fn visit_page(&mut self, _century: Century, _page: &PageEntry, _size: PageSize) {
//!         self.0 += 1;
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::model::{Century, LayoutDocument, PageEntry, PageSize};
use crate::parser::SkipReason;

/// Trait for receiving documents and pages during a corpus scan.
pub trait CorpusVisitor {
    /// Called once per accepted document, before its pages.
    ///
    /// # Arguments
    /// * `path` - File the document was read from
    /// * `century` - Bucket derived from the start year
    /// * `document` - The decoded document
    fn visit_document(&mut self, path: &Path, century: Century, document: &LayoutDocument) {
        let _ = (path, century, document);
    }

    /// Called for every page whose size passed validation.
    ///
    /// # Arguments
    /// * `century` - Bucket of the owning document
    /// * `page` - The page entry
    /// * `size` - Validated page size
    fn visit_page(&mut self, century: Century, page: &PageEntry, size: PageSize) {
        let _ = (century, page, size);
    }

    /// Called for every file that contributed nothing.
    fn visit_skip(&mut self, path: &Path, reason: &SkipReason) {
        let _ = (path, reason);
    }
}

/// Composite visitor that forwards to several borrowed visitors, in order.
#[derive(Default)]
pub struct CompositeVisitor<'a> {
    visitors: Vec<&'a mut dyn CorpusVisitor>,
}

impl<'a> CompositeVisitor<'a> {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor(mut self, visitor: &'a mut dyn CorpusVisitor) -> Self {
        self.visitors.push(visitor);
        self
    }

    /// Number of chained visitors.
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    /// Check if no visitor is chained.
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl CorpusVisitor for CompositeVisitor<'_> {
    fn visit_document(&mut self, path: &Path, century: Century, document: &LayoutDocument) {
        for visitor in &mut self.visitors {
            visitor.visit_document(path, century, document);
        }
    }

    fn visit_page(&mut self, century: Century, page: &PageEntry, size: PageSize) {
        for visitor in &mut self.visitors {
            visitor.visit_page(century, page, size);
        }
    }

    fn visit_skip(&mut self, path: &Path, reason: &SkipReason) {
        for visitor in &mut self.visitors {
            visitor.visit_skip(path, reason);
        }
    }
}

/// Visitor that counts documents and valid pages per century.
#[derive(Debug, Clone, Default)]
pub struct CenturyCensus {
    documents: BTreeMap<Century, usize>,
    pages: BTreeMap<Century, usize>,
}

impl CenturyCensus {
    /// Create an empty census.
    pub fn new() -> Self {
        Self::default()
    }

    /// `(century, documents, pages)` rows in ascending century order.
    pub fn rows(&self) -> Vec<(Century, usize, usize)> {
        self.documents
            .iter()
            .map(|(&century, &docs)| {
                (century, docs, self.pages.get(&century).copied().unwrap_or(0))
            })
            .collect()
    }
}

impl CorpusVisitor for CenturyCensus {
    fn visit_document(&mut self, _path: &Path, century: Century, _document: &LayoutDocument) {
        *self.documents.entry(century).or_default() += 1;
    }

    fn visit_page(&mut self, century: Century, _page: &PageEntry, _size: PageSize) {
        *self.pages.entry(century).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        documents: usize,
        pages: usize,
        skips: usize,
    }

    impl CorpusVisitor for Counting {
        fn visit_document(&mut self, _: &Path, _: Century, _: &LayoutDocument) {
            self.documents += 1;
        }

        fn visit_page(&mut self, _: Century, _: &PageEntry, _: PageSize) {
            self.pages += 1;
        }

        fn visit_skip(&mut self, _: &Path, _: &SkipReason) {
            self.skips += 1;
        }
    }

    #[test]
    fn test_composite_forwards_to_all() {
        let mut first = Counting::default();
        let mut second = Counting::default();
        {
            let mut composite = CompositeVisitor::new()
                .with_visitor(&mut first)
                .with_visitor(&mut second);
            assert_eq!(composite.len(), 2);

            let doc = LayoutDocument::new();
            let page = PageEntry::new(10.0, 20.0);
            composite.visit_document(Path::new("a.json"), Century(9), &doc);
            composite.visit_page(Century(9), &page, PageSize::new(10.0, 20.0));
            composite.visit_skip(Path::new("b.json"), &SkipReason::InvalidYear);
        }
        for counter in [&first, &second] {
            assert_eq!(counter.documents, 1);
            assert_eq!(counter.pages, 1);
            assert_eq!(counter.skips, 1);
        }
    }

    #[test]
    fn test_census_rows() {
        let mut census = CenturyCensus::new();
        let doc = LayoutDocument::new();
        let page = PageEntry::new(10.0, 20.0);
        census.visit_document(Path::new("a.json"), Century(12), &doc);
        census.visit_document(Path::new("b.json"), Century(9), &doc);
        census.visit_page(Century(12), &page, PageSize::new(10.0, 20.0));

        assert_eq!(census.rows(), vec![(Century(9), 1, 0), (Century(12), 1, 1)]);
    }
}
