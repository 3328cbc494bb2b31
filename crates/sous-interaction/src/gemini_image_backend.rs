//! Image generation over Gemini's image-capable models.

use sous_core::backend::ImageGenerationBackend;
use sous_core::config::GeminiConfig;
use sous_core::error::Result;

use crate::gemini_api::{Content, GeminiHttp, GenerateContentRequest, GenerationConfig, ImageConfig};

/// Image backend: `generateContent` on an image model, reading the first
/// `inlineData` part of the reply.
#[derive(Clone)]
pub struct GeminiImageBackend {
    http: GeminiHttp,
    model: String,
}

impl GeminiImageBackend {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::from_http(GeminiHttp::new(config), config.image_model())
    }

    pub fn from_http(http: GeminiHttp, model: impl Into<String>) -> Self {
        Self {
            http,
            model: model.into(),
        }
    }
}

fn build_image_request(prompt: &str, aspect_ratio: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            ..GenerationConfig::default()
        }),
    }
}

#[async_trait::async_trait]
impl ImageGenerationBackend for GeminiImageBackend {
    async fn call(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<String>> {
        let request = build_image_request(prompt, aspect_ratio);
        let response = self.http.generate_content(&self.model, &request).await?;

        let image = response.inline_image().map(str::to_string);
        if image.is_none() {
            tracing::debug!("[gemini_image] model {} returned no image part", self.model);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_sets_aspect_ratio() {
        let request = build_image_request("a plated omelette", "16:9");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert!(value["generationConfig"].get("responseSchema").is_none());
    }
}
