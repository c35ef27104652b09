//! Data models and structures
//!
//! Defines the payload types exchanged between the upload encoder, the
//! generation client, and the session controller, plus environment-driven
//! configuration.

use serde::{Deserialize, Serialize};

/// A locally selected image, encoded and ready to send to the service.
///
/// Replaced wholesale whenever a new file is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Full `data:<mediaType>;base64,<payload>` string.
    pub data_uri: String,
    pub media_type: String,
    pub file_name: String,
}

/// Image payload returned by a single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Raw base64 payload, no data-URI header.
    pub data: String,
    pub media_type: String,
}

impl GenerationResult {
    pub fn new(data: String, media_type: String) -> Self {
        Self { data, media_type }
    }

    /// Projects the result into the directly renderable data-URI form.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub image_model: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?,
            image_model: std::env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
        })
    }
}
