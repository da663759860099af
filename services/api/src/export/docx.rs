//! services/api/src/export/docx.rs
//!
//! DOCX renderer.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};
use logos_core::domain::SermonMetadata;
use logos_core::outline::Outline;
use logos_core::ports::{PortError, PortResult};

use super::markdown::{compose_header, normalize};

// Run sizes are half-points.
const TITLE_SIZE: usize = 40;
const HEADING_SIZE: usize = 28;

fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).size(HEADING_SIZE).bold())
}

fn body(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

/// A labelled entry: a bold lead-in run followed by the detail text.
fn labelled(label: &str, detail: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(label).bold())
        .add_run(Run::new().add_text(format!(" — {detail}")))
}

pub fn build_docx(outline: &Outline, metadata: &SermonMetadata) -> PortResult<Vec<u8>> {
    let header = compose_header(metadata);

    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text(header.title.as_str())
                    .size(TITLE_SIZE)
                    .bold(),
            ),
        )
        .add_paragraph(body(&format!("Categoria: {}", header.category)))
        .add_paragraph(body(&format!("Profundidade: {}", header.depth)))
        .add_paragraph(body(""))
        .add_paragraph(heading("Tese"))
        .add_paragraph(body(&normalize(&outline.thesis, "")));

    docx = docx.add_paragraph(heading("Pontos principais"));
    for (index, point) in outline.points.iter().enumerate() {
        docx = docx.add_paragraph(labelled(
            &format!("{}. {}", index + 1, point.title.trim()),
            point.summary.trim(),
        ));
    }

    docx = docx
        .add_paragraph(heading("Ilustração"))
        .add_paragraph(body(&normalize(&outline.illustration, "")));

    docx = docx.add_paragraph(heading("Referências bíblicas"));
    for reference in &outline.references {
        docx = docx.add_paragraph(labelled(
            reference.reference.trim(),
            reference.note.trim(),
        ));
    }

    docx = docx
        .add_paragraph(heading("Aplicação prática"))
        .add_paragraph(body(&normalize(&outline.call_to_action, "")));

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos_core::outline::GenerationRequest;

    #[test]
    fn produces_a_zip_container() {
        let request = GenerationRequest {
            category: "Temático".to_string(),
            theme: "Esperança".to_string(),
            depth: "curto".to_string(),
        };
        let outline = Outline::fallback(&request);
        let metadata = SermonMetadata {
            kind: "Sermão".to_string(),
            category: request.category,
            theme: request.theme,
            depth: request.depth,
        };

        let bytes = build_docx(&outline, &metadata).unwrap();
        // DOCX is a ZIP archive.
        assert!(bytes.starts_with(b"PK"));
    }
}
