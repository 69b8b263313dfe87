//! PDF page source backed by lopdf.
//!
//! Walks each page's content stream, tracking the text state well enough
//! to place every shown string on the page and attach the font it was set
//! in. Glyph widths are estimated, which is plenty for line grouping.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BBox, PageContent, Span};

use super::PageSource;

/// PDF magic bytes.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the header may appear.
const HEADER_WINDOW: usize = 1024;

/// Letter height, used when a page has no usable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Ascender and descender as fractions of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Bound on `/Parent` hops when looking up inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A PDF document opened as a page source.
pub struct PdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl std::fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSource")
            .field("version", &self.doc.version)
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !has_pdf_header(data) {
            return Err(Error::UnknownFormat);
        }

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            log::debug!("Document is encrypted; text may not decode");
        }

        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Raw (decompressed) content stream bytes of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string())),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, parts: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in parts {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    if let Ok(data) = s.decompressed_content() {
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
            }
        }
        content
    }

    /// Vertical extent of a page as (bottom, top), following `/Parent`
    /// links for an inherited MediaBox.
    fn page_frame(&self, page_id: ObjectId) -> Option<(f32, f32)> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(media_box) = dict.get(b"MediaBox") {
                let media_box = match media_box {
                    Object::Reference(r) => self.doc.get_object(*r).ok()?,
                    other => other,
                };
                let array = media_box.as_array().ok()?;
                if array.len() < 4 {
                    return None;
                }
                let y0 = array[1].as_float().ok()?;
                let y1 = array[3].as_float().ok()?;
                let (bottom, top) = (y0.min(y1), y0.max(y1));
                return (top - bottom > 0.0).then_some((bottom, top));
            }

            let parent = dict.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }

        None
    }

    fn info_dict(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.page_count()))?;

        let (bottom, top) = self
            .page_frame(page_id)
            .unwrap_or((0.0, DEFAULT_PAGE_HEIGHT));

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self.page_content(page_id)?;

        let scanner = ContentScanner {
            doc: &self.doc,
            fonts: &fonts,
            page_top: top,
            page: number,
        };

        let mut page = PageContent::new(number, top - bottom);
        for span in scanner.scan(&content)? {
            page.push(span);
        }
        Ok(page)
    }

    fn metadata_title(&self) -> Option<String> {
        self.info_dict()
            .and_then(|info| get_string_from_dict(info, b"Title"))
            .filter(|title| !title.trim().is_empty())
    }
}

/// Check for the `%PDF-` marker near the start of the data.
fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
}

/// Turns a decoded content stream into spans.
struct ContentScanner<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    page_top: f32,
    page: u32,
}

impl ContentScanner<'_> {
    fn scan(&self, content: &[u8]) -> Result<Vec<Span>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_key: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix.reset();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(key) = &op.operands[0] {
                            font_name = self.base_font(key);
                            font_key = key.clone();
                        }
                        font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "'" | "\"" => {
                    if op.operator != "Tj" {
                        matrix.next_line();
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let (true, Some(Object::String(bytes, _))) =
                        (in_text_block, op.operands.get(text_idx))
                    {
                        let text = self.decode(&font_key, bytes);
                        let start = matrix.position();
                        matrix.advance(text.chars().count() as f32 * GLYPH_WIDTH_EM * font_size);
                        spans.extend(self.span(text, start, &matrix, font_size, &font_name));
                    }
                }
                "TJ" => {
                    if let (true, Some(Object::Array(items))) = (in_text_block, op.operands.first())
                    {
                        let start = matrix.position();
                        let text = self.show_array(items, &font_key, &mut matrix, font_size);
                        spans.extend(self.span(text, start, &matrix, font_size, &font_name));
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode a TJ array, advancing the matrix over strings and kerning.
    ///
    /// Large negative adjustments stand in for word spaces.
    fn show_array(
        &self,
        items: &[Object],
        font_key: &[u8],
        matrix: &mut TextMatrix,
        font_size: f32,
    ) -> String {
        // In thousandths of an em
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = self.decode(font_key, bytes);
                    matrix.advance(decoded.chars().count() as f32 * GLYPH_WIDTH_EM * font_size);
                    combined.push_str(&decoded);
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    matrix.advance(adjustment / 1000.0 * font_size);
                    let breaks_word = adjustment > SPACE_THRESHOLD
                        && combined
                            .chars()
                            .last()
                            .map(|c| !c.is_whitespace() && !is_spaceless(c))
                            .unwrap_or(false);
                    if breaks_word {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    /// Decode shown bytes with the font's encoding when lopdf knows it.
    fn decode(&self, font_key: &[u8], bytes: &[u8]) -> String {
        self.fonts
            .get(font_key)
            .and_then(|font| font.get_font_encoding(self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    fn base_font(&self, key: &[u8]) -> String {
        self.fonts
            .get(key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string())
    }

    /// Build a top-down span from the pen positions before and after the
    /// text was shown.
    fn span(
        &self,
        text: String,
        start: (f32, f32),
        matrix: &TextMatrix,
        font_size: f32,
        font_name: &str,
    ) -> Option<Span> {
        if text.trim().is_empty() {
            return None;
        }

        let size = font_size * matrix.vertical_scale();
        let (x_start, baseline) = start;
        let (x_end, _) = matrix.position();
        let bbox = BBox::new(
            x_start.min(x_end),
            self.page_top - (baseline + size * ASCENT),
            x_start.max(x_end),
            self.page_top - (baseline - size * DESCENT),
        );

        Some(Span::new(text, size, font_name, bbox, self.page))
    }
}

/// Text and line matrices of a text object.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    /// Reset the matrices at `BT`; leading is graphics state and survives.
    fn reset(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    /// Move to the start of the next line, offset from the current one.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    /// Move the pen along the baseline by `width` text-space units.
    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
        self.f += width * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn is_spaceless(c: char) -> bool {
    crate::analysis::is_spaceless_script_char(c)
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with byte order mark
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}
