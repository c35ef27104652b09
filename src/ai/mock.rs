use super::ImageGenerationService;
use crate::models::GenerationResult;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Base64 of a 1x1 PNG, used when no scripted response is configured.
const TINY_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVQImWP4z8AAAAMBAQDJ/pLvAAAAAElFTkSuQmCC";

#[derive(Clone)]
enum MockResponse {
    Image(GenerationResult),
    Failure(String),
}

/// Call made against the mock, recorded for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub edited: bool,
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_result(self, result: GenerationResult) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Image(result));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, prompt: &str, edited: bool) -> Result<GenerationResult> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(RecordedCall {
            prompt: prompt.to_string(),
            edited,
        });
        let count = calls.len();
        drop(calls);

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(GenerationResult::new(
                TINY_PNG_B64.to_string(),
                "image/png".to_string(),
            ));
        }

        let index = (count - 1) % responses.len();
        match &responses[index] {
            MockResponse::Image(result) => Ok(result.clone()),
            MockResponse::Failure(message) => Err(Error::Api(message.clone())),
        }
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_from_text(&self, prompt: &str) -> Result<GenerationResult> {
        self.respond(prompt, false)
    }

    async fn edit_image(
        &self,
        _image_data: &str,
        _media_type: &str,
        prompt: &str,
    ) -> Result<GenerationResult> {
        self.respond(prompt, true)
    }
}
