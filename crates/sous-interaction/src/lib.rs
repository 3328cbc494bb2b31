//! Gemini REST implementations of the Sous backend capabilities.
//!
//! Each backend calls the Gemini HTTP API directly. Configuration (API key,
//! model names, endpoint) comes from [`sous_core::config::GeminiConfig`].

pub mod gemini_api;
pub mod gemini_chat_backend;
pub mod gemini_image_backend;
pub mod gemini_text_backend;
pub mod sse;

use std::sync::Arc;

use sous_core::backend::{ChatBackend, ImageGenerationBackend, TextGenerationBackend};
use sous_core::config::GeminiConfig;

pub use gemini_api::GeminiHttp;
pub use gemini_chat_backend::{GeminiChatBackend, GeminiChatSession};
pub use gemini_image_backend::GeminiImageBackend;
pub use gemini_text_backend::GeminiTextBackend;

/// The three Gemini backends sharing one HTTP connection pool.
#[derive(Clone)]
pub struct GeminiBackends {
    pub text: Arc<dyn TextGenerationBackend>,
    pub image: Arc<dyn ImageGenerationBackend>,
    pub chat: Arc<dyn ChatBackend>,
}

impl GeminiBackends {
    pub fn new(config: &GeminiConfig) -> Self {
        let http = GeminiHttp::new(config);
        Self {
            text: Arc::new(GeminiTextBackend::from_http(http.clone())),
            image: Arc::new(GeminiImageBackend::from_http(
                http.clone(),
                config.image_model(),
            )),
            chat: Arc::new(GeminiChatBackend::from_http(http, config.chat_model())),
        }
    }
}
