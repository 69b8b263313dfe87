//! Span cleanup and line assembly.
//!
//! Raw spans are NFC-normalized and stripped of bidirectional control
//! characters, then merged into logical lines when they share a vertical
//! band and continue each other horizontally.

use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::UnicodeNormalization;

use crate::model::{Line, Span};

/// Minimum vertical overlap, as a fraction of the shorter span, for two
/// spans to share a line.
const BAND_OVERLAP: f32 = 0.5;

/// Widest horizontal gap, in multiples of font size, bridged within a line.
const MAX_GAP_EM: f32 = 3.0;

/// Gap, in multiples of font size, above which a space separates two spans.
const SPACE_GAP_EM: f32 = 0.15;

/// Check if a character is a directional formatting control.
///
/// Covers the implicit marks (LRM, RLM, ALM) as well as the explicit
/// embedding, override, and isolate controls. Strong letters of RTL
/// scripts are never matched.
pub fn is_directional_control(c: char) -> bool {
    matches!(c, '\u{200E}' | '\u{200F}' | '\u{061C}')
        || matches!(
            bidi_class(c),
            BidiClass::LRE
                | BidiClass::RLE
                | BidiClass::LRO
                | BidiClass::RLO
                | BidiClass::PDF
                | BidiClass::LRI
                | BidiClass::RLI
                | BidiClass::FSI
                | BidiClass::PDI
        )
}

/// NFC-normalize and drop directional controls, keeping whitespace as is.
pub fn clean_text(raw: &str) -> String {
    raw.nfc().filter(|c| !is_directional_control(*c)).collect()
}

/// Clean text and collapse whitespace runs to single spaces.
///
/// This is the form headings and titles are emitted in.
pub fn normalize_text(raw: &str) -> String {
    clean_text(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key used to compare headings against the title.
pub fn comparison_key(text: &str) -> String {
    normalize_text(text).to_lowercase()
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Merge the spans of one page into logical lines.
///
/// Spans are taken in extraction order. Malformed spans (non-finite or
/// non-positive font size) and spans that are empty after cleanup are
/// dropped; lines whose text is empty after normalization are discarded.
pub fn build_lines(spans: &[Span]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();

    for span in spans {
        if !span.is_well_formed() {
            log::trace!(
                "Dropping malformed span on page {} (size {})",
                span.page,
                span.font_size
            );
            continue;
        }

        let text = clean_text(&span.text);
        if text.trim().is_empty() {
            continue;
        }
        let span = Span {
            text,
            ..span.clone()
        };

        let continues = current
            .last()
            .map(|prev| continues_line(prev, &span))
            .unwrap_or(false);

        if !continues && !current.is_empty() {
            lines.extend(finish_line(std::mem::take(&mut current)));
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.extend(finish_line(current));
    }

    lines
}

/// Whether `next` belongs to the same line as `prev`.
fn continues_line(prev: &Span, next: &Span) -> bool {
    if prev.page != next.page {
        return false;
    }

    let min_height = prev.bbox.height().min(next.bbox.height());
    let same_band = if min_height > 0.0 {
        prev.bbox.vertical_overlap(&next.bbox) >= min_height * BAND_OVERLAP
    } else {
        // Degenerate boxes: fall back to comparing top edges
        (prev.bbox.y0 - next.bbox.y0).abs() <= prev.font_size.min(next.font_size) * 0.3
    };
    if !same_band {
        return false;
    }

    let size = prev.font_size.max(next.font_size);
    let tolerance = prev.font_size.min(next.font_size);
    let max_gap = size * MAX_GAP_EM;

    let ltr_gap = next.bbox.x0 - prev.bbox.x1;
    let rtl_gap = prev.bbox.x0 - next.bbox.x1;

    (ltr_gap >= -tolerance && ltr_gap <= max_gap) || (rtl_gap >= -tolerance && rtl_gap <= max_gap)
}

/// Join the spans of a line and build it.
fn finish_line(spans: Vec<Span>) -> Option<Line> {
    let mut joined = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            if needs_space(prev, span) {
                joined.push(' ');
            }
        }
        joined.push_str(&span.text);
    }

    let text = normalize_text(&joined);
    if text.is_empty() {
        return None;
    }
    Line::from_spans(text, &spans)
}

fn needs_space(prev: &Span, next: &Span) -> bool {
    let prev_ends_with_space = prev.text.ends_with(char::is_whitespace);
    let next_starts_with_space = next.text.starts_with(char::is_whitespace);
    if prev_ends_with_space || next_starts_with_space {
        return false;
    }

    let gap = (next.bbox.x0 - prev.bbox.x1).max(prev.bbox.x0 - next.bbox.x1);
    if gap <= prev.font_size.min(next.font_size) * SPACE_GAP_EM {
        return false;
    }

    let prev_spaceless = prev
        .text
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    let next_spaceless = next
        .text
        .chars()
        .next()
        .map(is_spaceless_script_char)
        .unwrap_or(false);

    !(prev_spaceless && next_spaceless)
}
