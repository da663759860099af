//! services/api/src/export/mod.rs
//!
//! Renders a stored outline into the downloadable document formats. The
//! renderers are pure: the same artifact and format always produce the same
//! document.

pub mod docx;
pub mod markdown;
pub mod pdf;

use std::str::FromStr;

use logos_core::domain::SermonMetadata;
use logos_core::outline::Outline;
use logos_core::ports::{PortError, PortResult};
use regex::Regex;
use uuid::Uuid;

/// The document formats the export endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Md,
}

impl FromStr for ExportFormat {
    type Err = PortError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "md" => Ok(ExportFormat::Md),
            other => Err(PortError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Md => "text/markdown; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Md => "md",
        }
    }
}

/// Renders the outline into the requested format.
pub fn render(
    outline: &Outline,
    metadata: &SermonMetadata,
    format: ExportFormat,
) -> PortResult<Vec<u8>> {
    match format {
        ExportFormat::Pdf => pdf::build_pdf(outline, metadata),
        ExportFormat::Docx => docx::build_docx(outline, metadata),
        ExportFormat::Md => Ok(markdown::build_markdown(outline, metadata).into_bytes()),
    }
}

/// Derives the attachment filename stem from the artifact's theme (or
/// category), slugged down to lowercase ASCII and capped at 40 characters,
/// always suffixed with the artifact id.
pub fn build_filename(metadata: &SermonMetadata, id: Uuid) -> String {
    let source = if !metadata.theme.trim().is_empty() {
        metadata.theme.clone()
    } else {
        metadata.category.clone()
    };

    let separator = Regex::new("[^a-z0-9]+").unwrap();
    let normalized: String = separator
        .replace_all(&source.to_lowercase(), "-")
        .trim_matches('-')
        .chars()
        .take(40)
        .collect();

    let suffix = if normalized.is_empty() {
        format!("sermao-{id}")
    } else {
        normalized
    };
    format!("{suffix}-{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(theme: &str, category: &str) -> SermonMetadata {
        SermonMetadata {
            kind: "Sermão".to_string(),
            category: category.to_string(),
            theme: theme.to_string(),
            depth: "curto".to_string(),
        }
    }

    #[test]
    fn filename_slugs_the_theme() {
        let id = Uuid::nil();
        let name = build_filename(&metadata("A Graça de Deus!", "Expositivo"), id);
        assert_eq!(name, format!("a-gra-a-de-deus-{id}"));
    }

    #[test]
    fn filename_falls_back_to_category_then_id() {
        let id = Uuid::nil();
        assert_eq!(
            build_filename(&metadata("", "Devocional"), id),
            format!("devocional-{id}")
        );
        assert_eq!(
            build_filename(&metadata("", "!!!"), id),
            format!("sermao-{id}-{id}")
        );
    }

    #[test]
    fn filename_is_capped_at_forty_characters_before_the_id() {
        let id = Uuid::nil();
        let long_theme = "palavra ".repeat(20);
        let name = build_filename(&metadata(&long_theme, ""), id);
        let stem = name.strip_suffix(&format!("-{id}")).unwrap();
        assert!(stem.len() <= 40);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(matches!(
            "txt".parse::<ExportFormat>(),
            Err(PortError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn known_formats_parse() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Md);
    }
}
