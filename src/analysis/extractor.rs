//! The outline extraction pipeline.

use std::path::Path;

use crate::error::Result;
use crate::model::{HeadingEntry, Line, Outline, PageContent};
use crate::options::OutlineOptions;
use crate::source::{MemorySource, PageSource, PdfSource};

use super::assemble::OutlineAssembler;
use super::classify::{HeadingRules, LineClassifier};
use super::normalize::build_lines;
use super::profile::TypographyProfiler;
use super::title::TitleDetector;

/// Lines of one page, ready for classification.
#[derive(Debug, Clone)]
struct PageLines {
    number: u32,
    height: Option<f32>,
    lines: Vec<Line>,
}

/// Infers a document's title and heading outline.
///
/// The extractor holds only immutable configuration and compiled
/// patterns, so one instance can serve many documents concurrently.
///
/// # Example
///
/// ```no_run
/// use unoutline::{OutlineExtractor, OutlineOptions};
///
/// let extractor = OutlineExtractor::new(OutlineOptions::default())?;
/// let outline = extractor.extract_path("report.pdf");
/// println!("{}: {} headings", outline.title, outline.entries.len());
/// # Ok::<(), unoutline::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct OutlineExtractor {
    options: OutlineOptions,
    rules: HeadingRules,
}

impl OutlineExtractor {
    /// Create an extractor, validating the options.
    pub fn new(options: OutlineOptions) -> Result<Self> {
        options.validate()?;
        let rules = HeadingRules::new(&options);
        Ok(Self { options, rules })
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a PDF file.
    ///
    /// Never fails: a document that cannot be read yields an empty outline.
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Outline {
        let path = path.as_ref();
        self.try_extract_path(path).unwrap_or_else(|e| {
            log::warn!("Failed to extract outline from {}: {}", path.display(), e);
            Outline::empty()
        })
    }

    /// Extract the outline of a PDF file, reporting failures.
    pub fn try_extract_path<P: AsRef<Path>>(&self, path: P) -> Result<Outline> {
        let source = PdfSource::open(path)?;
        self.extract(&source)
    }

    /// Extract the outline of an in-memory PDF.
    ///
    /// Never fails: a document that cannot be read yields an empty outline.
    pub fn extract_bytes(&self, data: &[u8]) -> Outline {
        self.try_extract_bytes(data).unwrap_or_else(|e| {
            log::warn!("Failed to extract outline: {}", e);
            Outline::empty()
        })
    }

    /// Extract the outline of an in-memory PDF, reporting failures.
    pub fn try_extract_bytes(&self, data: &[u8]) -> Result<Outline> {
        let source = PdfSource::from_bytes(data)?;
        self.extract(&source)
    }

    /// Extract the outline of pre-extracted pages.
    pub fn extract_pages(
        &self,
        pages: Vec<PageContent>,
        metadata_title: Option<&str>,
    ) -> Result<Outline> {
        let mut source = MemorySource::new(pages);
        if let Some(title) = metadata_title {
            source = source.with_title(title);
        }
        self.extract(&source)
    }

    /// Extract the outline from any page source.
    pub fn extract<S: PageSource + ?Sized>(&self, source: &S) -> Result<Outline> {
        let page_count = source.page_count();
        let scanned = page_count.min(self.options.max_pages);
        if page_count > scanned {
            log::warn!(
                "Document has {} pages; only the first {} are scanned for headings",
                page_count,
                scanned
            );
        }

        let pages: Vec<PageLines> = (1..=scanned)
            .map(|number| load_page(source, number))
            .collect();

        self.assemble(&pages, source.metadata_title().as_deref())
    }

    fn assemble(&self, pages: &[PageLines], metadata_title: Option<&str>) -> Result<Outline> {
        let profile_pages = self.options.profile_pages as usize;
        let profile = TypographyProfiler::new(&self.options).profile(
            pages
                .iter()
                .take(profile_pages)
                .flat_map(|page| page.lines.iter()),
        );
        profile.validate()?;

        let (first_lines, first_height) = match pages.first() {
            Some(page) => (page.lines.as_slice(), page.height),
            None => (&[][..], None),
        };
        let title = TitleDetector::new(&self.rules, &self.options).detect(
            first_lines,
            first_height,
            metadata_title,
            &profile,
        );

        let classifier = LineClassifier::new(&self.rules, &self.options);
        let mut assembler = OutlineAssembler::new(title.text.clone());

        for page in pages {
            for line in &page.lines {
                if page.number == 1 && title.in_band(line) {
                    log::trace!("Page 1 {:?}: inside title band", line.text);
                    continue;
                }

                let verdict = classifier.classify(line, &profile);
                log::trace!("Page {} {:?}: {:?}", page.number, line.text, verdict);

                if let Some(level) = verdict.level() {
                    assembler.push(
                        HeadingEntry::new(level, line.text.clone(), line.page).at(line.top()),
                    );
                }
            }
        }

        let outline = assembler.finish();
        log::debug!(
            "Outline for {} pages: title {:?}, {} entries",
            pages.len(),
            outline.title,
            outline.entries.len()
        );
        Ok(outline)
    }
}

/// Load and line-build one page; a page that fails to load is empty.
fn load_page<S: PageSource + ?Sized>(source: &S, number: u32) -> PageLines {
    match source.page(number) {
        Ok(mut page) => {
            for span in &mut page.spans {
                span.page = number;
            }
            PageLines {
                number,
                height: page.height,
                lines: build_lines(&page.spans),
            }
        }
        Err(e) => {
            log::warn!("Skipping page {}: {}", number, e);
            PageLines {
                number,
                height: None,
                lines: Vec::new(),
            }
        }
    }
}
