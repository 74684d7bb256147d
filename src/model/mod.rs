//! Layout record model.
//!
//! These types mirror the JSON layout records of a manuscript corpus: a
//! document with a start year and page entries, each page carrying typed
//! rectangular zones with optional transcribed lines.

mod century;
mod document;
mod lenient;
mod zone;

pub use century::Century;
pub use document::{LayoutDocument, Orientation, PageEntry, PageSize};
pub use zone::{TextLine, Zone, ZoneRect, ZoneType};
