//! One-shot (optionally schema-constrained) text generation over Gemini.

use serde_json::Value;
use sous_core::backend::TextGenerationBackend;
use sous_core::config::GeminiConfig;
use sous_core::error::Result;

use crate::gemini_api::{Content, GeminiHttp, GenerateContentRequest, GenerationConfig};

/// Text generation backend that calls `models/{model}:generateContent`.
#[derive(Clone)]
pub struct GeminiTextBackend {
    http: GeminiHttp,
}

impl GeminiTextBackend {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::from_http(GeminiHttp::new(config))
    }

    pub fn from_http(http: GeminiHttp) -> Self {
        Self { http }
    }
}

fn build_text_request(prompt: &str, response_schema: Option<&Value>) -> GenerateContentRequest {
    let generation_config = response_schema.map(|schema| GenerationConfig {
        response_mime_type: Some("application/json".to_string()),
        response_schema: Some(schema.clone()),
        image_config: None,
    });

    GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        system_instruction: None,
        generation_config,
    }
}

#[async_trait::async_trait]
impl TextGenerationBackend for GeminiTextBackend {
    async fn call(
        &self,
        model: &str,
        prompt: &str,
        response_schema: Option<&Value>,
    ) -> Result<String> {
        tracing::debug!(
            "[gemini_text] generateContent model={} structured={}",
            model,
            response_schema.is_some()
        );
        let request = build_text_request(prompt, response_schema);
        let response = self.http.generate_content(model, &request).await?;
        // An empty body is passed through; structured callers reject it.
        Ok(response.text())
    }
}
