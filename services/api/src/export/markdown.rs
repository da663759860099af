//! services/api/src/export/markdown.rs
//!
//! Shared text shaping for the document renderers, plus the Markdown
//! renderer itself.

use logos_core::domain::SermonMetadata;
use logos_core::outline::Outline;

/// The document header shared by every renderer.
pub struct ExportHeader {
    pub title: String,
    pub category: String,
    pub depth: String,
}

/// Blank fields render as an explicit placeholder rather than vanishing.
pub fn normalize(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn compose_header(metadata: &SermonMetadata) -> ExportHeader {
    let kind = normalize(&metadata.kind, "Sermão");
    let theme = normalize(&metadata.theme, "Tema não informado");
    ExportHeader {
        title: format!("{kind} — {theme}"),
        category: normalize(&metadata.category, "Categoria não informada"),
        depth: normalize(&metadata.depth, "curto"),
    }
}

/// Renders the outline as a Markdown document. Pure and byte-stable: the
/// same artifact always yields the same text.
pub fn build_markdown(outline: &Outline, metadata: &SermonMetadata) -> String {
    let header = compose_header(metadata);

    let mut sections: Vec<String> = Vec::new();
    sections.push(format!("# {}", header.title));
    sections.push(format!("*Categoria:* {}", header.category));
    sections.push(format!("*Profundidade:* {}", header.depth));
    sections.push(String::new());
    sections.push("## Tese".to_string());
    sections.push(normalize(&outline.thesis, "Não informado"));
    sections.push(String::new());
    sections.push("## Pontos principais".to_string());
    for (index, point) in outline.points.iter().enumerate() {
        sections.push(format!(
            "### {}. {}",
            index + 1,
            normalize(&point.title, &format!("Ponto {}", index + 1))
        ));
        sections.push(point.summary.trim().to_string());
        sections.push(String::new());
    }
    sections.push("## Ilustração".to_string());
    sections.push(normalize(&outline.illustration, "Não informado"));
    sections.push(String::new());
    sections.push("## Referências bíblicas".to_string());
    for reference in &outline.references {
        sections.push(format!(
            "- **{}** — {}",
            reference.reference.trim(),
            reference.note.trim()
        ));
    }
    sections.push(String::new());
    sections.push("## Aplicação prática".to_string());
    sections.push(normalize(&outline.call_to_action, "Não informado"));

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos_core::outline::GenerationRequest;

    fn sample() -> (Outline, SermonMetadata) {
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
        (outline, metadata)
    }

    #[test]
    fn markdown_carries_every_section_in_order() {
        let (outline, metadata) = sample();
        let markdown = build_markdown(&outline, &metadata);

        let tese = markdown.find("## Tese").unwrap();
        let pontos = markdown.find("## Pontos principais").unwrap();
        let ilustracao = markdown.find("## Ilustração").unwrap();
        let referencias = markdown.find("## Referências bíblicas").unwrap();
        let aplicacao = markdown.find("## Aplicação prática").unwrap();
        assert!(tese < pontos && pontos < ilustracao);
        assert!(ilustracao < referencias && referencias < aplicacao);

        assert!(markdown.starts_with("# Sermão — Salmo 23"));
        assert!(markdown.contains("### 1. Dependência do Senhor"));
        assert!(markdown.contains("- **Mateus 5:14-16**"));
    }

    #[test]
    fn markdown_rendering_is_byte_stable() {
        let (outline, metadata) = sample();
        assert_eq!(
            build_markdown(&outline, &metadata),
            build_markdown(&outline, &metadata)
        );
    }

    #[test]
    fn blank_metadata_renders_placeholders() {
        let (outline, _) = sample();
        let markdown = build_markdown(&outline, &SermonMetadata::default());
        assert!(markdown.starts_with("# Sermão — Tema não informado"));
        assert!(markdown.contains("*Categoria:* Categoria não informada"));
        assert!(markdown.contains("*Profundidade:* curto"));
    }
}
