//! Structured Generation Client
//!
//! Sends a prompt together with a declared response schema and turns the
//! backend's JSON answer into a typed value, or a validation error.

use std::sync::Arc;

use sous_core::backend::TextGenerationBackend;
use sous_core::error::Result;
use sous_core::schema::{StructuredOutput, parse_structured};

/// Typed wrapper around a [`TextGenerationBackend`] bound to one model.
#[derive(Clone)]
pub struct StructuredGenerationClient {
    backend: Arc<dyn TextGenerationBackend>,
    model: String,
}

impl StructuredGenerationClient {
    pub fn new(backend: Arc<dyn TextGenerationBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a `T` for `prompt`.
    ///
    /// The backend is handed `T::response_schema()` and its answer is
    /// validated locally against the same schema before deserialization.
    /// There is no retry and no fallback value.
    ///
    /// # Errors
    ///
    /// - `SousError::Transport` if the backend call fails
    /// - `SousError::Validation` if the answer is empty, not JSON, or does not
    ///   satisfy the schema
    pub async fn generate<T: StructuredOutput>(&self, prompt: &str) -> Result<T> {
        let schema = T::response_schema();
        tracing::debug!(
            "[structured_generation] requesting {} from model={}",
            T::NAME,
            self.model
        );

        let raw = self.backend.call(&self.model, prompt, Some(&schema)).await?;

        parse_structured::<T>(&raw).inspect_err(|err| {
            tracing::warn!("[structured_generation] rejected {} response: {}", T::NAME, err);
        })
    }
}
