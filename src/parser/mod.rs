//! Layout record parsing module.

mod features;
mod layout_parser;
mod options;

pub use features::{token_count, tokenize, PageFeatures};
pub use layout_parser::{parse_outcome, FileOutcome, LayoutParser, SkipReason};
pub use options::{DimensionCheck, ErrorMode, ParseOptions};
