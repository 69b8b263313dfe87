//! Document title detection.

use std::cmp::Ordering;

use crate::model::Line;
use crate::options::OutlineOptions;

use super::classify::HeadingRules;
use super::normalize::normalize_text;
use super::profile::DocumentProfile;

/// Where the title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// A first-page line; the index points into that page's lines.
    FirstPage(usize),
    /// The document metadata.
    Metadata,
    /// No title could be found.
    None,
}

/// The detected title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleChoice {
    /// Normalized title text (empty when nothing was found)
    pub text: String,
    /// How the title was found
    pub source: TitleSource,
    /// Lowest top edge, in points from the page top, inside the title band
    pub band_limit: f32,
}

impl TitleChoice {
    /// Index of the first-page line used as the title, if any.
    pub fn line_index(&self) -> Option<usize> {
        match self.source {
            TitleSource::FirstPage(index) => Some(index),
            _ => None,
        }
    }

    /// Check if a first-page line lies in the title band.
    ///
    /// Such lines belong to the title area and never become headings.
    pub fn in_band(&self, line: &Line) -> bool {
        line.top() <= self.band_limit
    }
}

/// Picks the title among the first page's lines.
#[derive(Debug, Clone)]
pub struct TitleDetector<'a> {
    rules: &'a HeadingRules,
    band: f32,
}

impl<'a> TitleDetector<'a> {
    /// Create a detector over a compiled rule set.
    pub fn new(rules: &'a HeadingRules, options: &OutlineOptions) -> Self {
        Self {
            rules,
            band: options.title_band,
        }
    }

    /// Detect the title.
    ///
    /// Candidates are first-page lines in the top band of the page that pass
    /// the heading exclusion filters, are not numbered sections, and are no
    /// smaller than body text. The largest wins; ties go to the topmost,
    /// then leftmost line. Without a candidate the metadata title is used.
    pub fn detect(
        &self,
        first_page: &[Line],
        page_height: Option<f32>,
        metadata_title: Option<&str>,
        profile: &DocumentProfile,
    ) -> TitleChoice {
        let height = page_height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or_else(|| {
                first_page
                    .iter()
                    .map(|l| l.bbox.y1)
                    .fold(0.0_f32, f32::max)
            });
        let band_limit = height * self.band;

        let best = first_page
            .iter()
            .enumerate()
            .filter(|(_, line)| line.top() <= band_limit)
            .filter(|(_, line)| profile.ratio(line.font_size) >= 1.0)
            .filter(|(_, line)| self.rules.exclusion(&line.text).is_none())
            .filter(|(_, line)| self.rules.numbering_depth(&line.text).is_none())
            .min_by(|(_, a), (_, b)| {
                b.font_size
                    .partial_cmp(&a.font_size)
                    .unwrap_or(Ordering::Equal)
                    .then(a.top().partial_cmp(&b.top()).unwrap_or(Ordering::Equal))
                    .then(a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal))
            });

        if let Some((index, line)) = best {
            log::debug!("Title from first page line {}: {:?}", index, line.text);
            return TitleChoice {
                text: line.text.clone(),
                source: TitleSource::FirstPage(index),
                band_limit,
            };
        }

        match metadata_title.map(normalize_text) {
            Some(text) if !text.is_empty() => {
                log::debug!("Title from document metadata: {:?}", text);
                TitleChoice {
                    text,
                    source: TitleSource::Metadata,
                    band_limit,
                }
            }
            _ => {
                log::debug!("No title found");
                TitleChoice {
                    text: String::new(),
                    source: TitleSource::None,
                    band_limit,
                }
            }
        }
    }
}
