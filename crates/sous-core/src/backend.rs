//! Generation backend capabilities.
//!
//! These traits are the seam between the orchestration layer and whatever
//! model provider serves it. `sous-interaction` implements them over the
//! Gemini REST API; tests implement them with scripted mocks.
//!
//! Implementations never retry and never validate content: they return raw
//! text and leave parsing to the caller.

use std::sync::Arc;

use futures::stream::BoxStream;
use serde_json::Value;

use crate::error::Result;

/// A lazy, finite, non-restartable sequence of reply text chunks.
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// One-shot text generation.
#[async_trait::async_trait]
pub trait TextGenerationBackend: Send + Sync {
    /// Generates text for `prompt` with `model`.
    ///
    /// When `response_schema` is given the backend is asked for conforming
    /// JSON. Compliance is not guaranteed.
    ///
    /// # Errors
    ///
    /// `SousError::Transport` on network, auth or quota failure.
    async fn call(&self, model: &str, prompt: &str, response_schema: Option<&Value>)
    -> Result<String>;
}

/// Image generation.
#[async_trait::async_trait]
pub trait ImageGenerationBackend: Send + Sync {
    /// Returns the base64 payload of the first inline image, or `None` when
    /// the response carries no image part.
    async fn call(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<String>>;
}

/// Factory for stateful streaming chat sessions.
pub trait ChatBackend: Send + Sync {
    /// Opens a session bound to a fixed system instruction.
    fn create_session(&self, system_instruction: &str) -> Arc<dyn ChatBackendSession>;
}

/// A multi-turn chat session held by the backend.
#[async_trait::async_trait]
pub trait ChatBackendSession: Send + Sync {
    /// Sends `message` and returns the reply as a stream of text chunks.
    ///
    /// An `Err` here means the stream could not be opened; errors yielded by
    /// the stream mean it broke midway.
    async fn send_stream(&self, message: &str) -> Result<ChunkStream>;
}
