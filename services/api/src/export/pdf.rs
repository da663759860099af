//! services/api/src/export/pdf.rs
//!
//! PDF renderer built on the built-in Helvetica fonts, so no font files ship
//! with the service.

use std::io::BufWriter;

use logos_core::domain::SermonMetadata;
use logos_core::outline::Outline;
use logos_core::ports::{PortError, PortResult};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::markdown::{compose_header, normalize};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_LEFT: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 20.0;
const TOP_START: f64 = 272.0;
const BODY_SIZE: f64 = 12.0;
const SECTION_SIZE: f64 = 16.0;
const TITLE_SIZE: f64 = 20.0;
// Helvetica at 12pt fits roughly this many characters across the text width.
const WRAP_COLUMNS: usize = 88;

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f64,
}

impl PageWriter {
    fn new(title: &str) -> PortResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP_START,
        })
    }

    fn advance(&mut self, line_height: f64) {
        if self.y - line_height < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_START;
        } else {
            self.y -= line_height;
        }
    }

    fn line(&mut self, text: &str, size: f64, bold: bool, indent: f64) {
        let font = if bold { self.bold.clone() } else { self.regular.clone() };
        self.advance(size * 0.5);
        self.layer
            .use_text(text, size as f32, Mm((MARGIN_LEFT + indent) as f32), Mm(self.y as f32), &font);
    }

    fn paragraph(&mut self, text: &str, bold: bool, indent: f64) {
        for line in wrap(text, WRAP_COLUMNS) {
            self.line(&line, BODY_SIZE, bold, indent);
        }
    }

    fn section_title(&mut self, text: &str) {
        self.advance(6.0);
        self.line(text, SECTION_SIZE, true, 0.0);
        self.advance(2.0);
    }

    fn spacer(&mut self) {
        self.advance(4.0);
    }

    fn finish(self) -> PortResult<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.doc
                .save(&mut writer)
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        Ok(bytes)
    }
}

/// Greedy word wrap; a single overlong word gets a line of its own.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub fn build_pdf(outline: &Outline, metadata: &SermonMetadata) -> PortResult<Vec<u8>> {
    let header = compose_header(metadata);
    let mut writer = PageWriter::new(&header.title)?;

    writer.line(&header.title, TITLE_SIZE, true, 0.0);
    writer.spacer();
    writer.line(&format!("Categoria: {}", header.category), BODY_SIZE, false, 0.0);
    writer.line(&format!("Profundidade: {}", header.depth), BODY_SIZE, false, 0.0);

    writer.section_title("Tese");
    writer.paragraph(&normalize(&outline.thesis, ""), false, 0.0);

    writer.section_title("Pontos principais");
    for (index, point) in outline.points.iter().enumerate() {
        writer.line(
            &format!("{}. {}", index + 1, point.title.trim()),
            BODY_SIZE,
            true,
            0.0,
        );
        writer.paragraph(point.summary.trim(), false, 4.0);
        writer.spacer();
    }

    writer.section_title("Ilustração");
    writer.paragraph(&normalize(&outline.illustration, ""), false, 0.0);

    writer.section_title("Referências bíblicas");
    for reference in &outline.references {
        writer.line(reference.reference.trim(), BODY_SIZE, true, 0.0);
        writer.paragraph(reference.note.trim(), false, 4.0);
    }

    writer.section_title("Aplicação prática");
    writer.paragraph(&normalize(&outline.call_to_action, ""), false, 0.0);

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos_core::outline::GenerationRequest;

    #[test]
    fn produces_a_pdf_document() {
        let request = GenerationRequest {
            category: "Expositivo".to_string(),
            theme: "Salmo 23".to_string(),
            depth: "curto".to_string(),
        };
        let outline = Outline::fallback(&request);
        let metadata = SermonMetadata {
            kind: "Sermão".to_string(),
            category: request.category,
            theme: request.theme,
            depth: request.depth,
        };

        let bytes = build_pdf(&outline, &metadata).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_respects_the_column_budget() {
        let text = "palavra ".repeat(40);
        for line in wrap(&text, 30) {
            assert!(line.chars().count() <= 30);
        }
    }

    #[test]
    fn wrap_keeps_an_overlong_word_on_its_own_line() {
        let lines = wrap("supercalifragilisticoexpialidoce", 10);
        assert_eq!(lines.len(), 1);
    }
}
