//! crates/logos_core/src/outline.rs
//!
//! The structured sermon outline: its shape, the structural rules enforced
//! at the generation boundary, the free-tier prompt, and the deterministic
//! fallback used whenever the external generator cannot deliver.

use serde::{Deserialize, Serialize};

/// A structured sermon outline.
///
/// The JSON shape (`callToAction` key included) is part of the public API
/// and of the storage format; it must survive a store/load cycle unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub thesis: String,
    pub points: Vec<OutlinePoint>,
    pub illustration: String,
    pub references: Vec<ScriptureReference>,
    #[serde(rename = "callToAction")]
    pub call_to_action: String,
    /// Provenance written by the generator (`generator`, `depth`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GeneratorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlinePoint {
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureReference {
    pub reference: String,
    pub note: String,
}

/// Records which generator produced an outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorInfo {
    pub generator: String,
    pub depth: String,
}

/// A structural rule an outline failed to satisfy.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OutlineViolation {
    #[error("thesis must not be empty")]
    EmptyThesis,
    #[error("outline must have between 2 and 3 points, got {0}")]
    PointCount(usize),
    #[error("illustration must not be empty")]
    EmptyIllustration,
    #[error("outline must cite between 3 and 5 references, got {0}")]
    ReferenceCount(usize),
    #[error("call to action must not be empty")]
    EmptyCallToAction,
}

impl Outline {
    /// Checks the structural rules of a well-formed outline: a non-empty
    /// thesis, 2-3 points, a non-empty illustration, 3-5 scripture
    /// references, and a non-empty call to action.
    pub fn validate(&self) -> Result<(), OutlineViolation> {
        if self.thesis.trim().is_empty() {
            return Err(OutlineViolation::EmptyThesis);
        }
        if !(2..=3).contains(&self.points.len()) {
            return Err(OutlineViolation::PointCount(self.points.len()));
        }
        if self.illustration.trim().is_empty() {
            return Err(OutlineViolation::EmptyIllustration);
        }
        if !(3..=5).contains(&self.references.len()) {
            return Err(OutlineViolation::ReferenceCount(self.references.len()));
        }
        if self.call_to_action.trim().is_empty() {
            return Err(OutlineViolation::EmptyCallToAction);
        }
        Ok(())
    }

    /// Builds the canned template outline used when the external generator is
    /// unavailable or returns something unusable. Deterministic for a given
    /// request, and always structurally valid.
    pub fn fallback(request: &GenerationRequest) -> Outline {
        Outline {
            thesis: format!(
                "Em {}, Deus nos chama a viver a fé com propósito {}.",
                request.theme,
                request.category.to_lowercase()
            ),
            points: vec![
                OutlinePoint {
                    title: "Dependência do Senhor".to_string(),
                    summary: "Reconheça que somente na presença de Deus encontramos direção segura para cada passo.".to_string(),
                },
                OutlinePoint {
                    title: "Prática intencional da Palavra".to_string(),
                    summary: "Aplique as Escrituras no cotidiano para que a fé seja percebida em atitudes concretas.".to_string(),
                },
                OutlinePoint {
                    title: "Impacto na comunidade".to_string(),
                    summary: "Permita que a transformação pessoal alcance outras pessoas com esperança e serviço.".to_string(),
                },
            ],
            illustration: "Imagine um lampião em uma noite escura: quando abastecido e aceso, torna-se referência para todos ao redor. Assim é a vida que se rende a Cristo.".to_string(),
            references: vec![
                ScriptureReference {
                    reference: "Mateus 5:14-16".to_string(),
                    note: "Somos chamados a iluminar o mundo com boas obras.".to_string(),
                },
                ScriptureReference {
                    reference: "Romanos 12:2".to_string(),
                    note: "Transformação pela renovação da mente para discernir a vontade de Deus.".to_string(),
                },
                ScriptureReference {
                    reference: "Salmos 37:5".to_string(),
                    note: "Entregar os caminhos ao Senhor com confiança.".to_string(),
                },
            ],
            call_to_action: "Convide a igreja a comprometer-se com momentos diários de devoção, servindo uns aos outros com amor intencional.".to_string(),
            metadata: Some(GeneratorInfo {
                generator: "fallback".to_string(),
                depth: request.depth.clone(),
            }),
        }
    }
}

/// The parameters of one generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub category: String,
    pub theme: String,
    pub depth: String,
}

impl GenerationRequest {
    /// Builds the exact instruction sent to the generation collaborator.
    /// The text is persisted verbatim with the artifact.
    pub fn prompt(&self) -> String {
        format!(
            r#"Você é um assistente pastoral que escreve esboços de sermão para líderes cristãos em português (pt-BR).
Gere um único esboço completo seguindo rigorosamente o formato JSON especificado.
Contexto do pedido:
- Categoria: {category}
- Tema ou texto-base: {theme}
- Profundidade: {depth}

Requisitos do esboço:
1. Apresente uma tese central clara e concisa que resuma a mensagem principal.
2. Desenvolva entre 2 e 3 pontos principais numerados, cada um com uma breve explicação prática.
3. Inclua uma ilustração única que ajude a aplicar a tese de forma memorável.
4. Cite de 3 a 5 referências bíblicas relevantes (livro, capítulo e versículo) com pequenas notas de aplicação.
5. Finalize com um chamado à ação que reforce a aplicação pastoral.

Formato de saída (JSON válido, sem texto adicional):
{{
  "thesis": "string",
  "points": [
    {{ "title": "string", "summary": "string" }}
  ],
  "illustration": "string",
  "references": [
    {{ "reference": "Livro capítulo:versículo", "note": "string" }}
  ],
  "callToAction": "string"
}}"#,
            category = self.category,
            theme = self.theme,
            depth = self.depth,
        )
    }
}
