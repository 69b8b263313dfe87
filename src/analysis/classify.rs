//! Line classification.
//!
//! Every candidate line runs through a ranked signal cascade; the first
//! signal that fires decides:
//!
//! 1. exclusion filters (URLs, emails, addresses, pure numbers, ...)
//! 2. section numbering (`1`, `1.2`, `1.2.3` → H1, H2, H3)
//! 3. font-size tier, with boldness breaking near-ties upward
//! 4. leading heading keyword
//!
//! A line that none of them claims is body text.

use regex::Regex;

use crate::model::{HeadingLevel, Line};
use crate::options::OutlineOptions;

use super::keywords::match_keyword;
use super::profile::DocumentProfile;

/// Slack for floating-point comparisons against tier thresholds.
const RATIO_EPSILON: f32 = 1e-4;

/// Digits a leading number needs before a numbered line can be an address.
const HOUSE_NUMBER_DIGITS: usize = 3;

/// Why a line was rejected before any heading signal was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Empty,
    SingleCharacter,
    Punctuation,
    PureNumber,
    Email,
    Url,
    Address,
    Phone,
    Caption,
    FormField,
    TooLong,
}

/// The signal that produced a heading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Numbering,
    FontTier,
    Keyword,
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The line is a heading at `level`.
    Heading { level: HeadingLevel, signal: Signal },
    /// An exclusion filter rejected the line.
    Excluded(Exclusion),
    /// The line lies beyond the page cap.
    OutOfRange,
    /// No signal fired.
    Body,
}

impl Verdict {
    /// Heading level, if the verdict is a heading.
    pub fn level(&self) -> Option<HeadingLevel> {
        match self {
            Verdict::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }
}

/// Compiled text patterns shared by title detection and classification.
#[derive(Debug, Clone)]
pub struct HeadingRules {
    numbered: Regex,
    pure_number: Regex,
    email: Regex,
    url: Regex,
    street: Regex,
    zip: Regex,
    phone: Regex,
    caption: Regex,
    form_field: Regex,
    max_chars: usize,
    max_words: usize,
}

impl HeadingRules {
    /// Compile the rule set.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            numbered: Regex::new(
                r"^(\d+(?:\.\d+)*)(?:[.)]\s*|[:.)]?\s+(?:[-–—:]\s+)?)(\p{L}.*)$",
            )
            .unwrap(),
            pure_number: Regex::new(r"^[\d\s.,:;/%()+#\-–—]*\d[\d\s.,:;/%()+#\-–—]*$").unwrap(),
            email: Regex::new(r"(?i)\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+\b").unwrap(),
            url: Regex::new(
                r"(?i)(?:\b(?:https?|ftp)://|\bwww\.|\b[\w-]+\.(?:com|org|net|edu|gov|io|info)\b)",
            )
            .unwrap(),
            street: Regex::new(
                r"(?i)\b(\d+)[a-z]?\s+(?:[\p{L}'.-]+\s+){0,2}(?:street|st|avenue|ave|road|rd|boulevard|blvd|parkway|pkwy|drive|dr|lane|ln|way|court|ct|suite|ste|unit|apt|floor)\b",
            )
            .unwrap(),
            zip: Regex::new(r"\b[A-Z]{2}\s+\d{5}(?:-\d{4})?\b").unwrap(),
            phone: Regex::new(r"^\+?\d{0,3}\s*\(?\d{3}\)?[\s.-]*\d{3}[\s.-]\d{4}$").unwrap(),
            caption: Regex::new(r"(?i)^(?:page|figure|fig\.|table|chart|diagram)\s+\d+").unwrap(),
            form_field: Regex::new(r"[_-]{3,}").unwrap(),
            max_chars: options.max_heading_chars,
            max_words: options.max_heading_words,
        }
    }

    /// Depth of a leading section number (`2.3.1 Results` → 3).
    pub fn numbering_depth(&self, text: &str) -> Option<usize> {
        self.numbered
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|number| number.as_str().split('.').count())
    }

    /// The first exclusion filter `text` trips, if any.
    pub fn exclusion(&self, text: &str) -> Option<Exclusion> {
        let text = text.trim();
        let char_count = text.chars().count();

        if char_count == 0 {
            return Some(Exclusion::Empty);
        }
        if char_count == 1 {
            return Some(Exclusion::SingleCharacter);
        }
        if !text.chars().any(char::is_alphanumeric) {
            return Some(Exclusion::Punctuation);
        }
        if self.phone.is_match(text) {
            return Some(Exclusion::Phone);
        }
        if self.pure_number.is_match(text) {
            return Some(Exclusion::PureNumber);
        }
        if self.email.is_match(text) {
            return Some(Exclusion::Email);
        }
        if self.url.is_match(text) {
            return Some(Exclusion::Url);
        }
        let numbered = self.numbered.is_match(text);
        if self.is_street_address(text, numbered) || self.zip.is_match(text) {
            return Some(Exclusion::Address);
        }
        if self.caption.is_match(text) {
            return Some(Exclusion::Caption);
        }
        if self.form_field.is_match(text) {
            return Some(Exclusion::FormField);
        }

        if char_count > self.max_chars
            || (!numbered && text.split_whitespace().count() > self.max_words)
        {
            return Some(Exclusion::TooLong);
        }

        None
    }

    /// A street keyword within two words of a number.
    ///
    /// On a numbered-section line ("2.3 Unit testing") the number must be
    /// house-number sized to count.
    fn is_street_address(&self, text: &str, numbered: bool) -> bool {
        self.street
            .captures_iter(text)
            .any(|caps| !numbered || caps[1].len() >= HOUSE_NUMBER_DIGITS)
    }
}

/// Assigns heading levels to lines.
#[derive(Debug, Clone)]
pub struct LineClassifier<'a> {
    rules: &'a HeadingRules,
    max_pages: u32,
    bold_promotion: f32,
}

impl<'a> LineClassifier<'a> {
    /// Create a classifier over a compiled rule set.
    pub fn new(rules: &'a HeadingRules, options: &OutlineOptions) -> Self {
        Self {
            rules,
            max_pages: options.max_pages,
            bold_promotion: options.bold_promotion,
        }
    }

    /// Classify one line against the document profile.
    pub fn classify(&self, line: &Line, profile: &DocumentProfile) -> Verdict {
        if line.page == 0 || line.page > self.max_pages {
            return Verdict::OutOfRange;
        }

        if let Some(exclusion) = self.rules.exclusion(&line.text) {
            return Verdict::Excluded(exclusion);
        }

        if let Some(depth) = self.rules.numbering_depth(&line.text) {
            return Verdict::Heading {
                level: HeadingLevel::from_depth(depth),
                signal: Signal::Numbering,
            };
        }

        if let Some(level) = self.font_tier(line, profile) {
            return Verdict::Heading {
                level,
                signal: Signal::FontTier,
            };
        }

        if let Some(level) = match_keyword(&line.text) {
            return Verdict::Heading {
                level,
                signal: Signal::Keyword,
            };
        }

        Verdict::Body
    }

    /// Highest tier whose threshold the line's size ratio reaches.
    ///
    /// A bold line sitting just under the next higher tier (within
    /// `bold_promotion` of its threshold) is pushed up one tier.
    fn font_tier(&self, line: &Line, profile: &DocumentProfile) -> Option<HeadingLevel> {
        let ratio = profile.ratio(line.font_size);
        if ratio <= 1.0 {
            return None;
        }

        let level = HeadingLevel::ALL
            .into_iter()
            .find(|&level| ratio + RATIO_EPSILON >= profile.tiers.get(level))?;

        if line.is_bold {
            if let Some(higher) = level.promoted() {
                if ratio + RATIO_EPSILON >= profile.tiers.get(higher) * self.bold_promotion {
                    return Some(higher);
                }
            }
        }

        Some(level)
    }
}
