//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Every variant renders as a single user-facing message string; the session
//! controller surfaces `Display` output verbatim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request was blocked: {0}")]
    Blocked(String),

    #[error("Model returned text instead of an image: {0}")]
    TextResponse(String),

    #[error("No image data found in response")]
    NoImageData,

    #[error("Image generation failed: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, Error>;
