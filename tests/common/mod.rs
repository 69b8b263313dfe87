//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use unoutline::{BBox, PageContent, Span};

/// A span whose width is estimated from its text.
pub fn span(text: &str, size: f32, font: &str, x0: f32, top: f32) -> Span {
    let width = text.chars().count() as f32 * size * 0.5;
    Span::new(text, size, font, BBox::new(x0, top, x0 + width, top + size), 0)
}

/// Append `count` lines of 10pt body text starting at `from`.
pub fn with_body(page: PageContent, from: f32, count: usize) -> PageContent {
    (0..count).fold(page, |page, i| {
        page.with_span(span(
            "Plain running text of the document body",
            10.0,
            "Times-Roman",
            72.0,
            from + i as f32 * 14.0,
        ))
    })
}

/// A page of nothing but body text.
pub fn body_page(number: u32) -> PageContent {
    with_body(PageContent::letter(number), 72.0, 30)
}

/// A text item drawn on a synthetic PDF page: font resource, size,
/// baseline position, and text.
pub type PdfText<'a> = (&'a str, i64, i64, i64, &'a str);

/// Build a PDF with Helvetica (`F1`) and Helvetica-Bold (`F2`) available.
pub fn pdf_bytes(pages: &[Vec<PdfText<'_>>], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids: Vec<Object> = Vec::new();
    for items in pages {
        let mut operations = Vec::new();
        for &(font, size, x, y, text) in items {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! { "Title" => Object::string_literal(title) });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A small report: title, numbered sections, and body text on two pages.
pub fn report_pdf() -> Vec<u8> {
    let body = "Plain running text of the body";
    pdf_bytes(
        &[
            vec![
                ("F2", 24, 72, 720, "Quarterly Report"),
                ("F1", 10, 72, 680, body),
                ("F1", 10, 72, 666, body),
                ("F1", 10, 72, 652, body),
            ],
            vec![
                ("F2", 16, 72, 720, "1. Introduction"),
                ("F1", 10, 72, 690, body),
                ("F1", 10, 72, 676, body),
                ("F2", 12, 72, 640, "1.1 Scope"),
                ("F1", 10, 72, 610, body),
            ],
        ],
        Some("Metadata Title"),
    )
}
