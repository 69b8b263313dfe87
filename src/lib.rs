//! # unoutline
//!
//! Title and heading outline inference for PDF documents.
//!
//! PDFs rarely carry a usable structure tree, so this library reads the
//! typography instead: it learns each document's body text size, derives
//! heading tiers relative to it, and combines font size, boldness, section
//! numbering, and heading keywords to produce a title plus an ordered
//! H1/H2/H3 outline.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoutline::{extract_outline, render, JsonFormat};
//!
//! fn main() -> unoutline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Per-document calibration**: heading tiers are ratios of the body size
//! - **Section numbering**: `1`, `1.2`, `1.2.3` map to H1, H2, H3
//! - **Multilingual**: NFC normalization, bidi control stripping, RTL and CJK lines
//! - **Noise filters**: URLs, emails, addresses, page numbers never become headings
//! - **Batch processing**: whole directories in parallel with Rayon

pub mod analysis;
pub mod batch;
pub mod error;
pub mod model;
pub mod options;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use analysis::OutlineExtractor;
pub use batch::{BatchEvent, BatchReport, BatchRunner, DocumentOutcome};
pub use error::{Error, Result};
pub use model::{BBox, HeadingEntry, HeadingLevel, Line, Outline, PageContent, Span};
pub use options::OutlineOptions;
pub use render::JsonFormat;
pub use source::{MemorySource, PageSource, PdfSource};

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use unoutline::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for entry in &outline.entries {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    OutlineExtractor::new(OutlineOptions::default())?.try_extract_path(path)
}

/// Extract the outline of a PDF file with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<Outline> {
    OutlineExtractor::new(options)?.try_extract_path(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_bytes(data: &[u8]) -> Result<Outline> {
    OutlineExtractor::new(OutlineOptions::default())?.try_extract_bytes(data)
}

/// Extract the outline of a PDF read from a reader.
pub fn extract_outline_reader<R: Read>(mut reader: R) -> Result<Outline> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    extract_outline_bytes(&data)
}

/// Extract the outline of a PDF file and render it as JSON.
///
/// # Example
///
/// ```no_run
/// use unoutline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_outline(path)?;
    render::to_json(&outline, format)
}

/// Builder for extracting outlines.
///
/// # Example
///
/// ```no_run
/// use unoutline::Unoutline;
///
/// let json = Unoutline::new()
///     .with_max_pages(20)
///     .with_title_band(0.3)
///     .extract("document.pdf")?
///     .to_json()?;
/// # Ok::<(), unoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unoutline {
    options: OutlineOptions,
    format: JsonFormat,
}

impl Unoutline {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the classification page cap.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.options = self.options.with_max_pages(pages);
        self
    }

    /// Set the number of pages sampled for the typography profile.
    pub fn with_profile_pages(mut self, pages: u32) -> Self {
        self.options = self.options.with_profile_pages(pages);
        self
    }

    /// Set the title search band (fraction of page height).
    pub fn with_title_band(mut self, band: f32) -> Self {
        self.options = self.options.with_title_band(band);
        self
    }

    /// Emit compact JSON.
    pub fn compact(mut self) -> Self {
        self.format = JsonFormat::Compact;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Extract the outline of a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<UnoutlineResult> {
        let outline = OutlineExtractor::new(self.options)?.try_extract_path(path)?;
        Ok(UnoutlineResult {
            outline,
            format: self.format,
        })
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(self, data: &[u8]) -> Result<UnoutlineResult> {
        let outline = OutlineExtractor::new(self.options)?.try_extract_bytes(data)?;
        Ok(UnoutlineResult {
            outline,
            format: self.format,
        })
    }

    /// Build a batch runner from these settings.
    pub fn batch(self) -> Result<BatchRunner> {
        let extractor = OutlineExtractor::new(self.options)?;
        Ok(BatchRunner::new(extractor).with_format(self.format))
    }
}

/// Result of an extraction with its rendering settings.
#[derive(Debug, Clone)]
pub struct UnoutlineResult {
    /// The extracted outline
    pub outline: Outline,
    format: JsonFormat,
}

impl UnoutlineResult {
    /// Render the outline as JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.outline, self.format)
    }

    /// Consume the result, returning the outline.
    pub fn into_outline(self) -> Outline {
        self.outline
    }
}
