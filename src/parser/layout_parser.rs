//! Layout record parser.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Century, LayoutDocument, PageEntry, PageSize};

use super::options::{ErrorMode, ParseOptions};

/// Layout record parser.
pub struct LayoutParser {
    doc: LayoutDocument,
    options: ParseOptions,
}

impl LayoutParser {
    /// Open a layout record file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a layout record file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a layout record from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a layout record from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let doc = serde_json::from_slice(data)?;
        Ok(Self { doc, options })
    }

    /// Parse a layout record from a string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_bytes(json.as_bytes())
    }

    /// Parse a layout record from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a layout record from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// The decoded document.
    pub fn document(&self) -> &LayoutDocument {
        &self.doc
    }

    /// Century bucket of the document.
    pub fn century(&self) -> Option<Century> {
        self.doc.century()
    }

    /// Pages whose size passes the configured dimension check.
    pub fn valid_pages(&self) -> impl Iterator<Item = (&PageEntry, PageSize)> + '_ {
        self.doc
            .files
            .iter()
            .filter_map(|page| self.options.page_size(page).map(|size| (page, size)))
    }

    /// Consume the parser and return the document.
    pub fn parse(self) -> Result<LayoutDocument> {
        Ok(self.doc)
    }
}

/// Why a file contributed nothing to the run.
#[derive(Debug)]
pub enum SkipReason {
    /// The file could not be read or decoded
    Unreadable(Error),
    /// The start year is absent or has no leading digits
    InvalidYear,
}

impl SkipReason {
    /// Check if the skip came from a read or decode failure.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, SkipReason::Unreadable(_))
    }
}

/// Result of reading one corpus file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The document has a usable century bucket
    Accepted {
        /// Bucket derived from the start year
        century: Century,
        /// The decoded document
        document: LayoutDocument,
    },
    /// The document contributes nothing
    Skipped(SkipReason),
}

impl FileOutcome {
    /// Check if the file was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, FileOutcome::Accepted { .. })
    }
}

/// Read one corpus file and classify it.
///
/// In lenient mode a read or decode failure is logged and reported as
/// [`SkipReason::Unreadable`]; in strict mode it is returned as an error.
pub fn parse_outcome<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<FileOutcome> {
    let path = path.as_ref();
    let document = match LayoutParser::open_with_options(path, options.clone()) {
        Ok(parser) => parser.parse()?,
        Err(e) => match options.error_mode {
            ErrorMode::Strict => return Err(e),
            ErrorMode::Lenient => {
                log::warn!("Error reading {}: {}", path.display(), e);
                return Ok(FileOutcome::Skipped(SkipReason::Unreadable(e)));
            }
        },
    };

    match document.century() {
        Some(century) => Ok(FileOutcome::Accepted { century, document }),
        None => {
            log::debug!("Skipping {}: no usable start_year", path.display());
            Ok(FileOutcome::Skipped(SkipReason::InvalidYear))
        }
    }
}
