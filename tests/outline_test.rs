//! Integration tests for outline inference.

mod common;

use common::{body_page, pdf_bytes, report_pdf, span, with_body};
use unoutline::analysis::comparison_key;
use unoutline::render::to_json;
use unoutline::{
    HeadingLevel, JsonFormat, MemorySource, Outline, OutlineExtractor, OutlineOptions,
    PageContent, Unoutline,
};

fn extractor() -> OutlineExtractor {
    OutlineExtractor::new(OutlineOptions::default()).unwrap()
}

fn extract(pages: Vec<PageContent>) -> Outline {
    extractor().extract_pages(pages, None).unwrap()
}

fn levels_and_texts(outline: &Outline) -> Vec<(HeadingLevel, &str, u32)> {
    outline
        .entries
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect()
}

#[test]
fn test_single_title_span() {
    let page = PageContent::letter(1).with_span(span("Annual Report", 24.0, "Helvetica", 72.0, 60.0));
    let outline = extractor()
        .extract_pages(vec![page], Some(""))
        .unwrap();

    assert_eq!(outline.title, "Annual Report");
    assert!(outline.entries.is_empty());
}

#[test]
fn test_numbered_heading_at_body_size() {
    let page2 = with_body(
        PageContent::letter(2).with_span(span("1. Introduction", 10.0, "Times-Roman", 72.0, 50.0)),
        80.0,
        20,
    );
    let outline = extract(vec![body_page(1), page2]);

    assert_eq!(
        levels_and_texts(&outline),
        [(HeadingLevel::H1, "1. Introduction", 2)]
    );
}

#[test]
fn test_numbering_beats_weak_font_ratio() {
    // 11pt against a 10pt body: the font tier alone would say H1
    let page3 = with_body(
        PageContent::letter(3).with_span(span("1.2 Background", 11.0, "Times-Roman", 72.0, 50.0)),
        80.0,
        20,
    );
    let outline = extract(vec![body_page(1), body_page(2), page3]);

    assert_eq!(
        levels_and_texts(&outline),
        [(HeadingLevel::H2, "1.2 Background", 3)]
    );
}

#[test]
fn test_email_never_becomes_heading() {
    let page2 = with_body(
        PageContent::letter(2)
            .with_span(span("Results", 20.0, "Helvetica-Bold", 72.0, 50.0))
            .with_span(span("press@example.com", 28.0, "Helvetica-Bold", 72.0, 400.0)),
        90.0,
        20,
    );
    let outline = extract(vec![body_page(1), page2]);

    assert_eq!(outline.entries.len(), 1);
    assert_eq!(outline.entries[0].text, "Results");
    assert_eq!(outline.entries[0].level, HeadingLevel::H2);
}

#[test]
fn test_single_font_size_document() {
    let page1 = with_body(
        PageContent::letter(1).with_span(span("Overview", 10.0, "Times-Roman", 72.0, 40.0)),
        60.0,
        10,
    );
    let page2 = with_body(
        PageContent::letter(2)
            .with_span(span("A Plain Line", 10.0, "Times-Roman", 72.0, 40.0))
            .with_span(span("2. Method", 10.0, "Times-Roman", 72.0, 300.0))
            .with_span(span("Conclusion", 10.0, "Times-Roman", 72.0, 500.0)),
        60.0,
        10,
    );
    let outline = extract(vec![page1, page2]);

    assert_eq!(outline.title, "Overview");
    assert_eq!(
        levels_and_texts(&outline),
        [
            (HeadingLevel::H1, "2. Method", 2),
            (HeadingLevel::H2, "Conclusion", 2)
        ]
    );
}

#[test]
fn test_deep_numbering_ignores_font_size() {
    for size in [8.0, 10.0, 30.0] {
        let page2 = with_body(
            PageContent::letter(2).with_span(span("2.3.1 Results", size, "Helvetica", 72.0, 40.0)),
            80.0,
            20,
        );
        let outline = extract(vec![body_page(1), page2]);
        assert_eq!(
            levels_and_texts(&outline),
            [(HeadingLevel::H3, "2.3.1 Results", 2)],
            "size {}",
            size
        );
    }
}

#[test]
fn test_pages_beyond_cap_are_ignored() {
    let pages: Vec<PageContent> = (1..=60)
        .map(|n| {
            with_body(
                PageContent::letter(n).with_span(span(
                    &format!("{}. Section", n),
                    14.0,
                    "Helvetica-Bold",
                    72.0,
                    400.0,
                )),
                80.0,
                5,
            )
        })
        .collect();
    let outline = extract(pages);

    assert_eq!(outline.entries.len(), 50);
    assert!(outline.entries.iter().all(|e| (1..=50).contains(&e.page)));

    let capped = OutlineExtractor::new(OutlineOptions::new().with_max_pages(3))
        .unwrap()
        .extract(&MemorySource::new(vec![body_page(1), body_page(2)]))
        .unwrap();
    assert!(capped.entries.is_empty());
}

#[test]
fn test_title_is_not_repeated() {
    let page1 = with_body(
        PageContent::letter(1).with_span(span("Field Notes", 24.0, "Helvetica-Bold", 72.0, 50.0)),
        100.0,
        10,
    );
    let page2 = with_body(
        PageContent::letter(2)
            .with_span(span("FIELD  NOTES", 24.0, "Helvetica-Bold", 72.0, 40.0))
            .with_span(span("Appendix", 18.0, "Helvetica-Bold", 72.0, 400.0)),
        80.0,
        10,
    );
    let outline = extract(vec![page1, page2]);

    let title_key = comparison_key(&outline.title);
    assert_eq!(outline.title, "Field Notes");
    assert!(outline
        .entries
        .iter()
        .all(|e| comparison_key(&e.text) != title_key));
    assert_eq!(outline.entries.len(), 1);
}

#[test]
fn test_subtitle_in_title_band_is_not_a_heading() {
    let page1 = with_body(
        PageContent::letter(1)
            .with_span(span("Annual Report", 24.0, "Helvetica-Bold", 72.0, 60.0))
            .with_span(span("Fiscal Year Overview", 18.0, "Helvetica", 72.0, 110.0)),
        160.0,
        20,
    );
    let outline = extract(vec![page1, body_page(2)]);

    assert_eq!(outline.title, "Annual Report");
    assert!(outline.entries.is_empty());
}

#[test]
fn test_entries_follow_reading_order() {
    // Spans delivered bottom-up within each page
    let page2 = PageContent::letter(2)
        .with_span(span("2.2 Later", 10.0, "Times-Roman", 72.0, 600.0))
        .with_span(span("2.1 Earlier", 10.0, "Times-Roman", 72.0, 100.0));
    let page3 = PageContent::letter(3).with_span(span("3. Next", 10.0, "Times-Roman", 72.0, 300.0));
    let outline = extract(vec![body_page(1), page2, page3]);

    let order: Vec<_> = outline.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(order, ["2.1 Earlier", "2.2 Later", "3. Next"]);

    let positions: Vec<_> = outline.entries.iter().map(|e| (e.page, e.top)).collect();
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_directional_marks_stripped_from_output() {
    let page1 = with_body(
        PageContent::letter(1).with_span(span(
            "\u{200F}التقرير السنوي\u{200F}",
            24.0,
            "Arial",
            300.0,
            50.0,
        )),
        100.0,
        10,
    );
    let page2 = with_body(
        PageContent::letter(2)
            .with_span(span("\u{202B}الفصل الأول\u{202C}", 24.0, "Arial-Bold", 300.0, 40.0))
            .with_span(span("\u{200E}מבוא\u{200E}", 10.0, "Arial", 300.0, 300.0)),
        80.0,
        10,
    );
    let outline = extract(vec![page1, page2]);

    assert_eq!(outline.title, "التقرير السنوي");
    assert_eq!(
        levels_and_texts(&outline),
        [
            (HeadingLevel::H1, "الفصل الأول", 2),
            (HeadingLevel::H2, "מבוא", 2)
        ]
    );

    let json = to_json(&outline, JsonFormat::Pretty).unwrap();
    for mark in ['\u{200E}', '\u{200F}', '\u{202B}', '\u{202C}'] {
        assert!(!json.contains(mark));
    }
}

#[test]
fn test_decomposed_text_is_composed() {
    let page2 = PageContent::letter(2).with_span(span(
        "1. Re\u{0301}sume\u{0301}",
        10.0,
        "Times-Roman",
        72.0,
        40.0,
    ));
    let outline = extract(vec![body_page(1), page2]);
    assert_eq!(outline.entries[0].text, "1. Résumé");
}

#[test]
fn test_extraction_is_deterministic() {
    let build = || {
        let page1 = with_body(
            PageContent::letter(1).with_span(span("Design Review", 22.0, "Helvetica-Bold", 72.0, 50.0)),
            100.0,
            15,
        );
        let page2 = with_body(
            PageContent::letter(2)
                .with_span(span("Background", 16.0, "Helvetica-Bold", 72.0, 40.0))
                .with_span(span("1.1 Prior work", 10.0, "Times-Roman", 72.0, 400.0)),
            80.0,
            15,
        );
        vec![page1, page2]
    };

    let first = to_json(&extract(build()), JsonFormat::Pretty).unwrap();
    let second = to_json(&extract(build()), JsonFormat::Pretty).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_metadata_title_fallback() {
    let outline = extractor()
        .extract(
            &MemorySource::new(vec![with_body(PageContent::letter(1), 400.0, 10)])
                .with_title("From Metadata"),
        )
        .unwrap();
    assert_eq!(outline.title, "From Metadata");
}

#[test]
fn test_pdf_end_to_end() {
    let outline = extractor().extract_bytes(&report_pdf());

    assert_eq!(outline.title, "Quarterly Report");
    assert_eq!(
        levels_and_texts(&outline),
        [
            (HeadingLevel::H1, "1. Introduction", 2),
            (HeadingLevel::H2, "1.1 Scope", 2)
        ]
    );
}

#[test]
fn test_pdf_without_visible_title_uses_metadata() {
    let data = pdf_bytes(
        &[vec![("F1", 10, 72, 200, "Only a line of body text near the bottom")]],
        Some("Catalogued Name"),
    );
    let outline = extractor().extract_bytes(&data);
    assert_eq!(outline.title, "Catalogued Name");
    assert!(outline.entries.is_empty());
}

#[test]
fn test_corrupt_input_yields_empty_outline() {
    let outline = extractor().extract_bytes(b"%PDF-1.4 this is not really a pdf");
    assert!(outline.is_empty());
    assert_eq!(
        to_json(&outline, JsonFormat::Compact).unwrap(),
        r#"{"title":"","outline":[]}"#
    );
}

#[test]
fn test_builder_api() {
    let json = Unoutline::new()
        .with_max_pages(1)
        .compact()
        .extract_bytes(&report_pdf())
        .unwrap()
        .to_json()
        .unwrap();
    assert_eq!(json, r#"{"title":"Quarterly Report","outline":[]}"#);
}

#[test]
fn test_numbered_headings_with_street_words_survive() {
    let headings = [
        "2.3 Unit testing",
        "4 The Way Forward",
        "3.1 Floor plans",
        "1 Supreme Court rulings",
        "2.2 Integration testing",
    ];
    let page2 = headings
        .iter()
        .enumerate()
        .fold(PageContent::letter(2), |page, (i, text)| {
            page.with_span(span(text, 10.0, "Times-Roman", 72.0, 60.0 + i as f32 * 120.0))
        });
    let outline = extract(vec![body_page(1), page2]);

    let texts: Vec<_> = outline.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, headings);
}

#[test]
fn test_tiny_text_still_yields_outline() {
    let page1 = (0..20).fold(PageContent::letter(1), |page, i| {
        page.with_span(span("Fine print", 0.2, "Times-Roman", 72.0, 40.0 + i as f32 * 14.0))
    });
    let page2 = PageContent::letter(2).with_span(span("1. Introduction", 0.2, "Times-Roman", 72.0, 50.0));
    let outline = extract(vec![page1, page2]);

    assert_eq!(
        levels_and_texts(&outline),
        [(HeadingLevel::H1, "1. Introduction", 2)]
    );
}

#[test]
fn test_keyword_sentences_stay_body_text() {
    let page2 = with_body(
        PageContent::letter(2)
            .with_span(span("Part of the budget was reallocated.", 10.0, "Times-Roman", 72.0, 40.0))
            .with_span(span("Conclusion", 10.0, "Times-Roman", 72.0, 500.0)),
        80.0,
        20,
    );
    let outline = extract(vec![body_page(1), page2]);

    assert_eq!(
        levels_and_texts(&outline),
        [(HeadingLevel::H2, "Conclusion", 2)]
    );
}
