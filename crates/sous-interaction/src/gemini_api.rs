//! Shared Gemini REST plumbing: HTTP client, wire types and error mapping.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sous_core::config::GeminiConfig;
use sous_core::error::{Result, SousError};

/// HTTP handle shared by the text, image and chat backends.
///
/// The API key travels in the `x-goog-api-key` header so it never appears in
/// request URLs or in `reqwest` error messages.
#[derive(Clone)]
pub struct GeminiHttp {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiHttp {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url().to_string(),
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{model}:{method}", self.base_url)
    }

    /// Posts `body` and returns the response once its status is known to be
    /// successful.
    pub(crate) async fn post(
        &self,
        model: &str,
        method: &str,
        query: &[(&str, &str)],
        body: &GenerateContentRequest,
    ) -> Result<Response> {
        let response = self
            .client
            .post(self.endpoint(model, method))
            .query(query)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                SousError::transport(format!("Gemini API request failed: {}", err.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        Ok(response)
    }

    /// Calls `generateContent` and decodes the response envelope.
    pub(crate) async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.post(model, "generateContent", &[], body)
            .await?
            .json()
            .await
            .map_err(|err| {
                SousError::transport(format!(
                    "Failed to read Gemini response: {}",
                    err.without_url()
                ))
            })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::text("model", text)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text { text: String },
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PartResponse {
    pub text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InlineData {
    pub data: String,
}

#[derive(Deserialize)]
pub(crate) struct ErrorWrapper {
    pub error: ErrorBody,
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ErrorBody {
    pub fn describe(self, fallback: &str) -> String {
        let status_text = self.status.unwrap_or_default();
        let msg = self.message.unwrap_or_else(|| fallback.to_string());
        if status_text.is_empty() {
            msg
        } else {
            format!("{status_text}: {msg}")
        }
    }
}

impl GenerateContentResponse {
    fn first_parts(&self) -> impl Iterator<Item = &PartResponse> {
        self.candidates
            .iter()
            .flatten()
            .next()
            .and_then(|candidate| candidate.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
    }

    /// Concatenated text of the first candidate; empty when there is none.
    pub fn text(&self) -> String {
        self.first_parts()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }

    /// Base64 payload of the first inline image part of the first candidate.
    pub fn inline_image(&self) -> Option<&str> {
        self.first_parts()
            .find_map(|part| part.inline_data.as_ref())
            .map(|inline| inline.data.as_str())
    }
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> SousError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| wrapper.error.describe(body))
        .unwrap_or_else(|_| body.to_string());

    SousError::transport_status(status.as_u16(), message)
}
