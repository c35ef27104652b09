//! Session state controller for one generate/edit workflow.
//!
//! Owns the single piece of mutable state (selected image, prompt, result,
//! loading flag, error message) and orchestrates calls into the generation
//! client. The transitions themselves are synchronous and total; the two
//! async effects (file encoding, service calls) are run through
//! [`Session::select_image`] and [`Session::submit`]. Embedders with their
//! own event loop can drive [`Session::begin_submit`] /
//! [`Session::finish_submit`] directly.

use crate::ai::ImageGenerationService;
use crate::models::{GenerationResult, UploadedImage};
use crate::{upload, Result};
use std::path::Path;

pub const PROMPT_REQUIRED_MESSAGE: &str = "Please enter a prompt";
pub const UPLOAD_ERROR_MESSAGE: &str = "Could not load image";

/// Proof that a submit was started; carries the generation it belongs to so
/// outcomes arriving after a `clear` can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

pub struct Session {
    client: Box<dyn ImageGenerationService>,
    image: Option<UploadedImage>,
    prompt: String,
    result: Option<String>,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

impl Session {
    pub fn new(client: Box<dyn ImageGenerationService>) -> Self {
        Self {
            client,
            image: None,
            prompt: String::new(),
            result: None,
            error: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The rendered result as a data-URI, when the last submit succeeded.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Encodes a newly selected file.
    ///
    /// Success replaces any previous upload and clears result and error; a
    /// read failure surfaces the generic upload message (the platform cause
    /// is logged, not shown) and leaves the rest of the state untouched.
    pub async fn select_image(&mut self, path: &Path) {
        match upload::encode_image_file(path).await {
            Ok(image) => {
                tracing::info!("Loaded {} ({})", image.file_name, image.media_type);
                self.image = Some(image);
                self.result = None;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to load image {}: {}", path.display(), e);
                self.error = Some(UPLOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Gate for the submit effect.
    ///
    /// Returns `None` while a call is already in flight or when the prompt is
    /// empty (the latter also sets the prompt-required error). Otherwise
    /// clears error and result, raises the loading flag, and hands back a
    /// ticket for [`Session::finish_submit`].
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if self.loading {
            return None;
        }
        if self.prompt.trim().is_empty() {
            self.error = Some(PROMPT_REQUIRED_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        self.result = None;
        self.loading = true;
        Some(SubmitTicket {
            generation: self.generation,
        })
    }

    /// Applies the outcome of a dispatched call.
    ///
    /// Outcomes whose ticket predates the last `clear` are discarded; returns
    /// whether the outcome was applied.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, outcome: Result<GenerationResult>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("Discarding stale generation outcome");
            return false;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result.to_data_uri());
            }
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
        true
    }

    /// Runs one full submit: gate, dispatch, apply.
    ///
    /// Edits when an upload is present, generates from text otherwise.
    /// Returns whether a call was dispatched.
    pub async fn submit(&mut self) -> bool {
        let Some(ticket) = self.begin_submit() else {
            return false;
        };

        let prompt = self.prompt.clone();
        let outcome = match &self.image {
            Some(image) => {
                self.client
                    .edit_image(&image.data_uri, &image.media_type, &prompt)
                    .await
            }
            None => self.client.generate_from_text(&prompt).await,
        };

        self.finish_submit(ticket, outcome);
        true
    }

    /// Hard reset back to the initial state.
    ///
    /// Does not cancel in-flight network activity; any outcome still on the
    /// wire is detached via the generation counter and dropped on arrival.
    pub fn clear(&mut self) {
        self.image = None;
        self.prompt.clear();
        self.result = None;
        self.error = None;
        self.loading = false;
        self.generation += 1;
    }
}
