//! Outline types: the final artifact of inference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// All levels, highest first.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Level for a numbering depth (`1` → H1, `1.2` → H2, deeper → H3).
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// The next more prominent level, if any.
    pub fn promoted(self) -> Option<Self> {
        match self {
            HeadingLevel::H1 => None,
            HeadingLevel::H2 => Some(HeadingLevel::H1),
            HeadingLevel::H3 => Some(HeadingLevel::H2),
        }
    }

    /// Wire name ("H1", "H2", "H3").
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Normalized heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Top edge on the page, used for ordering only
    #[serde(skip)]
    pub top: f32,
}

impl HeadingEntry {
    /// Create a new heading entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            top: 0.0,
        }
    }

    /// Set the vertical position used for ordering.
    pub fn at(mut self, top: f32) -> Self {
        self.top = top;
        self
    }
}

/// Document title plus ordered heading entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Document title (may be empty)
    pub title: String,
    /// Heading entries in reading order
    #[serde(rename = "outline")]
    pub entries: Vec<HeadingEntry>,
}

impl Outline {
    /// Create an outline.
    pub fn new(title: impl Into<String>, entries: Vec<HeadingEntry>) -> Self {
        Self {
            title: title.into(),
            entries,
        }
    }

    /// The outline of a document that yielded nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there is neither a title nor any entry.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.entries.is_empty()
    }

    /// Number of entries at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }
}
