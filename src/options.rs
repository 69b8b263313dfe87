//! Engine options and configuration.

use crate::error::{Error, Result};

/// Options for outline inference.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Pages scanned for headings (pages beyond are never classified)
    pub max_pages: u32,

    /// Leading pages sampled by the typography profiler
    pub profile_pages: u32,

    /// Fraction of page height, from the top, searched for the title
    pub title_band: f32,

    /// Rounding unit applied to font sizes before counting
    pub size_precision: f32,

    /// Body size assumed for a document without any text
    pub default_body_size: f32,

    /// H1/H2/H3 ratios used when a document has no usable size spread
    pub fallback_tiers: [f32; 3],

    /// Lines longer than this many characters are body text
    pub max_heading_chars: usize,

    /// Unnumbered lines with more words than this are body text
    pub max_heading_words: usize,

    /// Fraction of the next tier's ratio a bold line needs to be promoted
    pub bold_promotion: f32,

    /// Whether the batch driver processes documents in parallel
    pub parallel: bool,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification page cap.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the number of pages sampled by the profiler.
    pub fn with_profile_pages(mut self, pages: u32) -> Self {
        self.profile_pages = pages;
        self
    }

    /// Set the title search band (fraction of page height).
    pub fn with_title_band(mut self, band: f32) -> Self {
        self.title_band = band;
        self
    }

    /// Set the font size rounding unit.
    pub fn with_size_precision(mut self, precision: f32) -> Self {
        self.size_precision = precision;
        self
    }

    /// Set the fallback tier ladder.
    pub fn with_fallback_tiers(mut self, h1: f32, h2: f32, h3: f32) -> Self {
        self.fallback_tiers = [h1, h2, h3];
        self
    }

    /// Set the maximum heading length in characters and words.
    pub fn with_max_heading_len(mut self, chars: usize, words: usize) -> Self {
        self.max_heading_chars = chars;
        self.max_heading_words = words;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that the options describe a usable engine.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(Error::InvalidOptions("max_pages must be at least 1".into()));
        }
        if self.profile_pages == 0 {
            return Err(Error::InvalidOptions(
                "profile_pages must be at least 1".into(),
            ));
        }
        if !(self.title_band > 0.0 && self.title_band <= 1.0) {
            return Err(Error::InvalidOptions(format!(
                "title_band must be in (0, 1], got {}",
                self.title_band
            )));
        }
        for (name, value) in [
            ("size_precision", self.size_precision),
            ("default_body_size", self.default_body_size),
            ("bold_promotion", self.bold_promotion),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let [h1, h2, h3] = self.fallback_tiers;
        if !(h1 > h2 && h2 > h3 && h3 >= 1.0) || !h1.is_finite() {
            return Err(Error::InvalidOptions(format!(
                "fallback tiers must satisfy H1 > H2 > H3 >= 1.0, got {}/{}/{}",
                h1, h2, h3
            )));
        }

        if self.max_heading_chars == 0 || self.max_heading_words == 0 {
            return Err(Error::InvalidOptions(
                "maximum heading length must be non-zero".into(),
            ));
        }

        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_pages: 50,
            profile_pages: 5,
            title_band: 0.4,
            size_precision: 0.5,
            default_body_size: 12.0,
            fallback_tiers: [1.5, 1.3, 1.15],
            max_heading_chars: 200,
            max_heading_words: 15,
            bold_promotion: 0.9,
            parallel: true,
        }
    }
}
