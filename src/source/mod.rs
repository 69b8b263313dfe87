//! Page sources.
//!
//! A page source hands the engine one page of raw spans at a time. The
//! engine never sees the underlying document format; [`PdfSource`] reads
//! PDF files through lopdf and [`MemorySource`] serves pre-extracted pages.

mod pdf;

pub use pdf::{decode_text_simple, PdfSource};

use crate::error::{Error, Result};
use crate::model::PageContent;

/// Abstract interface for paged span access.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Spans of one page (1-indexed).
    fn page(&self, number: u32) -> Result<PageContent>;

    /// Title recorded in the document metadata, if any.
    fn metadata_title(&self) -> Option<String> {
        None
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        (**self).page(number)
    }

    fn metadata_title(&self) -> Option<String> {
        (**self).metadata_title()
    }
}

/// A page source over pages already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PageContent>,
    title: Option<String>,
}

impl MemorySource {
    /// Create a source from pages, renumbering them 1..=n in order.
    pub fn new(pages: Vec<PageContent>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                let number = i as u32 + 1;
                page.number = number;
                for span in &mut page.spans {
                    span.page = number;
                }
                page
            })
            .collect();
        Self { pages, title: None }
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    fn metadata_title(&self) -> Option<String> {
        self.title.clone()
    }
}
