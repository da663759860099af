//! services/api/src/adapters/sermon_llm.rs
//!
//! This module contains the adapters for the sermon-outline generator.
//! Both implement the `SermonGenerator` port from the `core` crate: one backed
//! by an OpenAI-compatible LLM, one by the deterministic canned template for
//! deployments without an API key.

const SYSTEM_INSTRUCTIONS: &str = "Você é um assistente pastoral que produz esboços bíblicos práticos e fiéis às Escrituras em português do Brasil. Responda somente com o JSON pedido, sem texto adicional.";

use async_openai::{
    config::OpenAIConfig, error::OpenAIError, types::responses::CreateResponseArgs, Client,
};
use async_trait::async_trait;
use logos_core::outline::{GenerationRequest, GeneratorInfo, Outline};
use logos_core::ports::{PortError, PortResult, SermonGenerator};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SermonGenerator` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSermonAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSermonAdapter {
    /// Creates a new `OpenAiSermonAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Models occasionally wrap the JSON payload in a Markdown code fence
    /// despite the instructions; unwrap it before parsing.
    fn strip_code_fence(text: &str) -> &str {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        rest.strip_suffix("```").unwrap_or(rest).trim()
    }
}

//=========================================================================================
// `SermonGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl SermonGenerator for OpenAiSermonAdapter {
    /// Produces an outline for the request, or an error the caller recovers
    /// from with the canned template.
    async fn generate_outline(&self, request: &GenerationRequest) -> PortResult<Outline> {
        let api_request = CreateResponseArgs::default()
            .model(&self.model)
            .instructions(SYSTEM_INSTRUCTIONS)
            .input(request.prompt())
            .max_output_tokens(1500u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .responses()
            .create(api_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let raw_output = response.output_text().ok_or_else(|| {
            PortError::Unexpected("Sermon LLM response contained no text output.".to_string())
        })?;

        let mut outline: Outline =
            serde_json::from_str(Self::strip_code_fence(&raw_output)).map_err(|e| {
                PortError::Unexpected(format!("Sermon LLM returned unparsable JSON: {e}"))
            })?;

        outline
            .validate()
            .map_err(|violation| PortError::Unexpected(violation.to_string()))?;

        outline.metadata = Some(GeneratorInfo {
            generator: "openai".to_string(),
            depth: request.depth.clone(),
        });
        Ok(outline)
    }
}

//=========================================================================================
// Deterministic Template Adapter
//=========================================================================================

/// A generator for deployments without an API key: always answers with the
/// canned template outline.
#[derive(Clone, Default)]
pub struct TemplateSermonAdapter;

#[async_trait]
impl SermonGenerator for TemplateSermonAdapter {
    async fn generate_outline(&self, request: &GenerationRequest) -> PortResult<Outline> {
        Ok(Outline::fallback(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_json_code_fence() {
        let fenced = "```json\n{\"thesis\": \"x\"}\n```";
        assert_eq!(
            OpenAiSermonAdapter::strip_code_fence(fenced),
            "{\"thesis\": \"x\"}"
        );
    }

    #[test]
    fn leaves_bare_json_untouched() {
        assert_eq!(
            OpenAiSermonAdapter::strip_code_fence(" {\"thesis\": \"x\"} "),
            "{\"thesis\": \"x\"}"
        );
    }

    #[tokio::test]
    async fn template_adapter_is_deterministic_and_valid() {
        let request = GenerationRequest {
            category: "Devocional".to_string(),
            theme: "Gratidão".to_string(),
            depth: "médio".to_string(),
        };
        let adapter = TemplateSermonAdapter;
        let first = adapter.generate_outline(&request).await.unwrap();
        let second = adapter.generate_outline(&request).await.unwrap();
        assert!(first.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
