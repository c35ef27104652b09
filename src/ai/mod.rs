//! AI service integration for image generation and editing
//!
//! Provides the service trait the session controller is written against,
//! plus the Gemini implementation and a scripted mock for tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageGenerationClient;

use crate::models::GenerationResult;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generates an image from a text prompt alone.
    async fn generate_from_text(&self, prompt: &str) -> Result<GenerationResult>;

    /// Edits an existing image according to a text prompt.
    ///
    /// `image_data` may be a full data-URI or a bare base64 payload; the
    /// implementation strips any header before transmission.
    async fn edit_image(
        &self,
        image_data: &str,
        media_type: &str,
        prompt: &str,
    ) -> Result<GenerationResult>;
}
