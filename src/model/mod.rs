//! Data model for outline inference.
//!
//! Spans and pages are what a page source delivers; lines are the
//! per-document transients the engine classifies; the outline is the
//! final artifact handed to a serializer.

mod line;
mod outline;
mod page;
mod span;

pub use line::Line;
pub use outline::{HeadingEntry, HeadingLevel, Outline};
pub use page::PageContent;
pub use span::{BBox, Span};
