//! Outline assembly.

use std::cmp::Ordering;

use crate::model::{HeadingEntry, Outline};

use super::normalize::comparison_key;

/// Collects classified headings into the final outline.
#[derive(Debug, Default)]
pub struct OutlineAssembler {
    title: String,
    title_key: String,
    entries: Vec<HeadingEntry>,
}

impl OutlineAssembler {
    /// Start an outline for a document with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let title_key = comparison_key(&title);
        Self {
            title,
            title_key,
            entries: Vec::new(),
        }
    }

    /// Add a heading. Returns `false` when it duplicates the title and was
    /// dropped.
    pub fn push(&mut self, entry: HeadingEntry) -> bool {
        if !self.title_key.is_empty() && comparison_key(&entry.text) == self.title_key {
            log::trace!(
                "Dropping heading on page {} that repeats the title",
                entry.page
            );
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Number of headings collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no heading has been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish the outline, in page then vertical order.
    pub fn finish(mut self) -> Outline {
        let in_order = self
            .entries
            .windows(2)
            .all(|w| reading_order(&w[0], &w[1]) != Ordering::Greater);
        if !in_order {
            // Stable: entries sharing a position keep their insertion order
            self.entries.sort_by(reading_order);
        }
        Outline::new(self.title, self.entries)
    }
}

fn reading_order(a: &HeadingEntry, b: &HeadingEntry) -> Ordering {
    a.page
        .cmp(&b.page)
        .then(a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel::{H1, H2};

    #[test]
    fn test_title_duplicates_dropped() {
        let mut assembler = OutlineAssembler::new("Annual Report");
        assert!(!assembler.push(HeadingEntry::new(H1, "ANNUAL  report", 3)));
        assert!(assembler.push(HeadingEntry::new(H1, "Annual Report 2023", 3)));
        assert_eq!(assembler.len(), 1);

        let outline = assembler.finish();
        assert_eq!(outline.title, "Annual Report");
        assert_eq!(outline.entries[0].text, "Annual Report 2023");
    }

    #[test]
    fn test_empty_title_keeps_everything() {
        let mut assembler = OutlineAssembler::new("");
        assert!(assembler.push(HeadingEntry::new(H1, "Overview", 1)));
        assert!(!assembler.is_empty());
    }

    #[test]
    fn test_entries_sorted_by_page_then_top() {
        let mut assembler = OutlineAssembler::new("Doc");
        assembler.push(HeadingEntry::new(H2, "Later", 2).at(300.0));
        assembler.push(HeadingEntry::new(H1, "First", 1).at(400.0));
        assembler.push(HeadingEntry::new(H2, "Upper", 2).at(100.0));
        assembler.push(HeadingEntry::new(H2, "Also upper", 2).at(100.0));

        let texts: Vec<_> = assembler
            .finish()
            .entries
            .into_iter()
            .map(|e| e.text)
            .collect();
        assert_eq!(texts, ["First", "Upper", "Also upper", "Later"]);
    }
}
