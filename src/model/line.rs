//! Logical text lines.

use std::collections::BTreeMap;

use super::{BBox, Span};

/// One or more spans merged into a single reading-order text unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Normalized text (NFC, directional controls stripped, whitespace collapsed)
    pub text: String,
    /// Dominant font size (largest character coverage)
    pub font_size: f32,
    /// True if any constituent span is bold
    pub is_bold: bool,
    /// Union of constituent bounding boxes
    pub bbox: BBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Line {
    /// Build a line from already-cleaned spans and their joined text.
    ///
    /// Returns `None` when there are no spans.
    pub fn from_spans(text: String, spans: &[Span]) -> Option<Self> {
        let first = spans.first()?;

        let bbox = spans
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, s| acc.union(&s.bbox));

        Some(Self {
            text,
            font_size: dominant_size(spans),
            is_bold: spans.iter().any(|s| s.is_bold),
            bbox,
            page: first.page,
        })
    }

    /// Top edge of the line.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Left edge of the line.
    pub fn left(&self) -> f32 {
        self.bbox.x0
    }
}

/// The size covering the most characters; ties prefer the larger size.
fn dominant_size(spans: &[Span]) -> f32 {
    // Keyed in hundredths of a point so the map is ordered and hashable.
    let mut coverage: BTreeMap<i64, (usize, f32)> = BTreeMap::new();
    for span in spans {
        let key = (span.font_size * 100.0).round() as i64;
        let entry = coverage.entry(key).or_insert((0, span.font_size));
        entry.0 += span.text.chars().filter(|c| !c.is_whitespace()).count().max(1);
    }

    coverage
        .values()
        .max_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        })
        .map(|(_, size)| *size)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, font: &str, x0: f32) -> Span {
        Span::new(text, size, font, BBox::new(x0, 100.0, x0 + 40.0, 100.0 + size), 2)
    }

    #[test]
    fn test_line_from_spans() {
        let spans = vec![
            span("Chapter", 10.0, "Arial", 0.0),
            span("Overview of results", 14.0, "Arial-Bold", 45.0),
        ];
        let line = Line::from_spans("Chapter Overview of results".to_string(), &spans).unwrap();

        assert_eq!(line.font_size, 14.0);
        assert!(line.is_bold);
        assert_eq!(line.page, 2);
        assert_eq!(line.bbox, BBox::new(0.0, 100.0, 85.0, 114.0));
    }

    #[test]
    fn test_dominant_size_tie_prefers_larger() {
        let spans = vec![span("abcd", 10.0, "Arial", 0.0), span("wxyz", 16.0, "Arial", 50.0)];
        assert_eq!(dominant_size(&spans), 16.0);
    }

    #[test]
    fn test_line_from_no_spans() {
        assert!(Line::from_spans(String::new(), &[]).is_none());
    }
}
