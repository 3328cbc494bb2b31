//! Image Generation Client

use std::sync::Arc;

use sous_core::backend::ImageGenerationBackend;
use sous_core::error::Result;
use sous_core::kitchen::EncodedImage;

/// Aspect ratio requested for every dish photo.
pub const DISH_PHOTO_ASPECT_RATIO: &str = "16:9";

/// Produces a single illustrative image for a subject description.
#[derive(Clone)]
pub struct ImageGenerationClient {
    backend: Arc<dyn ImageGenerationBackend>,
    aspect_ratio: String,
}

impl ImageGenerationClient {
    pub fn new(backend: Arc<dyn ImageGenerationBackend>) -> Self {
        Self {
            backend,
            aspect_ratio: DISH_PHOTO_ASPECT_RATIO.to_string(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    /// Generates an image for `prompt`.
    ///
    /// Returns `Ok(None)` when the backend answered without an image part.
    /// Transport failures are returned as errors; deciding whether a missing
    /// image is fatal is the caller's business.
    pub async fn generate(&self, prompt: &str) -> Result<Option<EncodedImage>> {
        let payload = self.backend.call(prompt, &self.aspect_ratio).await?;
        Ok(payload
            .filter(|data| !data.trim().is_empty())
            .map(EncodedImage::from_png_base64))
    }
}
