use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::ImageGenerationService;
use crate::models::GenerationResult;
use crate::upload::base64_payload;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Candidate finish reasons that mean the service withheld the image on
/// policy grounds rather than failing technically.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "IMAGE_PROHIBITED_CONTENT",
    "RECITATION",
    "IMAGE_RECITATION",
    "BLOCKLIST",
];

#[derive(Debug, Serialize)]
struct ImageRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
}

impl ImageRequest {
    fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { role: None, parts }],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

/// Adapts a raw `generateContent` response into an image payload.
///
/// Precedence is deliberate and determines which message reaches the user:
/// inline image data wins, then an explicit block reason, then any text the
/// model answered with, then a generic no-data error.
pub(crate) fn extract_image(response: &GenerateContentResponse) -> Result<GenerationResult> {
    let inline = response.candidates.iter().find_map(|c| {
        c.content
            .as_ref()
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
    });
    if let Some(InlineData { mime_type, data }) = inline {
        return Ok(GenerationResult::new(data.clone(), mime_type.clone()));
    }

    if let Some(reason) = block_reason(response) {
        return Err(Error::Blocked(reason));
    }

    if let Some(text) = extract_text(response) {
        return Err(Error::TextResponse(text));
    }

    Err(Error::NoImageData)
}

fn block_reason(response: &GenerateContentResponse) -> Option<String> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Some(
                feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| reason.clone()),
            );
        }
    }

    response.candidates.iter().find_map(|c| {
        c.finish_reason
            .as_deref()
            .filter(|reason| BLOCKING_FINISH_REASONS.contains(reason))
            .map(str::to_string)
    })
}

/// Concatenated text parts of the first candidate, when any are present.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;

    let text = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(self, base_url: String) -> Self {
        Self {
            http: self.http.with_base_url(base_url),
        }
    }

    async fn request_image(&self, request: &ImageRequest) -> Result<GenerationResult> {
        let response: GenerateContentResponse = self.http.generate_content(request).await?;

        let result = extract_image(&response)?;
        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            result.media_type
        );
        Ok(result)
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_from_text(&self, prompt: &str) -> Result<GenerationResult> {
        let request = ImageRequest::new(vec![Part::Text {
            text: prompt.to_string(),
        }]);

        self.request_image(&request).await
    }

    async fn edit_image(
        &self,
        image_data: &str,
        media_type: &str,
        prompt: &str,
    ) -> Result<GenerationResult> {
        let request = ImageRequest::new(vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: media_type.to_string(),
                    data: base64_payload(image_data).to_string(),
                },
            },
            Part::Text {
                text: prompt.to_string(),
            },
        ]);

        self.request_image(&request).await
    }
}
