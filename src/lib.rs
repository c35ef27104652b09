//! promptshop - prompt-driven image generation and editing
//!
//! Wraps Google's Gemini image models behind a small session state machine:
//! optionally load a local photo, type a prompt, and receive a generated or
//! edited image as a renderable data-URI.

pub mod ai;
pub mod error;
pub mod models;
pub mod session;
pub mod upload;

pub use error::{Error, Result};
