//! Span-level types.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in top-down page space.
///
/// `y0` is the top edge and `y1` the bottom edge, both measured downward
/// from the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its corner coordinates.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Length of the vertical overlap between two boxes (0 when disjoint).
    pub fn vertical_overlap(&self, other: &BBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

/// A run of text sharing one font and style, as reported by a page source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The raw text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Bounding box in top-down page space
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Span {
    /// Create a new span, deriving bold/italic flags from the font name.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        bbox: BBox,
        page: u32,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            font_size,
            is_bold,
            is_italic,
            font_name,
            bbox,
            page,
        }
    }

    /// Override the bold flag.
    pub fn with_bold(mut self, is_bold: bool) -> Self {
        self.is_bold = is_bold;
        self
    }

    /// Whether the span can contribute to a line at all.
    pub fn is_well_formed(&self) -> bool {
        self.font_size.is_finite() && self.font_size > 0.0 && self.bbox.is_finite()
    }
}
