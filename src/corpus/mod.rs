//! Sequential corpus scanning.
//!
//! The [`Scanner`] reads each file once, classifies it, and forwards
//! accepted documents and their valid pages to a [`CorpusVisitor`].

mod visitor;

pub use visitor::{CenturyCensus, CompositeVisitor, CorpusVisitor};

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::parser::{parse_outcome, FileOutcome, ParseOptions, SkipReason};

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Files handed to the scanner
    pub files_seen: u64,
    /// Documents with a usable century
    pub documents_accepted: u64,
    /// Files that could not be read or decoded
    pub files_unreadable: u64,
    /// Documents skipped for an unusable start year
    pub invalid_years: u64,
    /// Pages whose size passed validation
    pub pages_accepted: u64,
    /// Pages dropped by the size check
    pub pages_rejected: u64,
}

impl ScanStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files that contributed nothing.
    pub fn files_skipped(&self) -> u64 {
        self.files_unreadable + self.invalid_years
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ScanStats) {
        self.files_seen += other.files_seen;
        self.documents_accepted += other.documents_accepted;
        self.files_unreadable += other.files_unreadable;
        self.invalid_years += other.invalid_years;
        self.pages_accepted += other.pages_accepted;
        self.pages_rejected += other.pages_rejected;
    }
}

/// Reads corpus files and feeds them to visitors.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ParseOptions,
    stats: ScanStats,
}

impl Scanner {
    /// Create a scanner with the given parse options.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            stats: ScanStats::new(),
        }
    }

    /// Parse options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Statistics so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Consume the scanner and return its statistics.
    pub fn into_stats(self) -> ScanStats {
        self.stats
    }

    /// Scan one file.
    ///
    /// Errors only in strict mode, for an unreadable file.
    pub fn scan_file(&mut self, path: &Path, visitor: &mut dyn CorpusVisitor) -> Result<()> {
        self.stats.files_seen += 1;

        let (century, document) = match parse_outcome(path, &self.options)? {
            FileOutcome::Accepted { century, document } => (century, document),
            FileOutcome::Skipped(reason) => {
                match reason {
                    SkipReason::Unreadable(_) => self.stats.files_unreadable += 1,
                    SkipReason::InvalidYear => self.stats.invalid_years += 1,
                }
                visitor.visit_skip(path, &reason);
                return Ok(());
            }
        };

        self.stats.documents_accepted += 1;
        visitor.visit_document(path, century, &document);

        for page in &document.files {
            match self.options.page_size(page) {
                Some(size) => {
                    self.stats.pages_accepted += 1;
                    visitor.visit_page(century, page, size);
                }
                None => {
                    self.stats.pages_rejected += 1;
                    log::trace!("{}: page with invalid size {:?} skipped", path.display(), page.wh);
                }
            }
        }
        Ok(())
    }

    /// Scan every file in order.
    pub fn scan_files<I, P>(&mut self, paths: I, visitor: &mut dyn CorpusVisitor) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.scan_file(path.as_ref(), visitor)?;
        }
        Ok(())
    }
}
