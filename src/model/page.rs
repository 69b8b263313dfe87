//! Page-level types.

use super::Span;

/// The raw spans of one page as delivered by a page source.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page height in points, when the source knows it
    pub height: Option<f32>,

    /// Spans in extraction order
    pub spans: Vec<Span>,
}

impl PageContent {
    /// Create a page with a known height.
    pub fn new(number: u32, height: f32) -> Self {
        Self {
            number,
            height: Some(height),
            spans: Vec::new(),
        }
    }

    /// Create a page with standard Letter height (11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 792.0) // 11 * 72
    }

    /// Create a page whose height is unknown.
    pub fn without_height(number: u32) -> Self {
        Self {
            number,
            height: None,
            spans: Vec::new(),
        }
    }

    /// Append a span, stamping it with this page's number.
    pub fn push(&mut self, mut span: Span) {
        span.page = self.number;
        self.spans.push(span);
    }

    /// Builder form of [`PageContent::push`].
    pub fn with_span(mut self, span: Span) -> Self {
        self.push(span);
        self
    }

    /// Check if the page carries no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    #[test]
    fn test_push_stamps_page_number() {
        let page = PageContent::letter(4).with_span(Span::new(
            "Hello",
            12.0,
            "Arial",
            BBox::new(0.0, 0.0, 30.0, 12.0),
            1,
        ));
        assert_eq!(page.spans[0].page, 4);
        assert_eq!(page.height, Some(792.0));
        assert!(!page.is_empty());
        assert!(PageContent::without_height(1).height.is_none());
    }
}
