//! Test doubles shared by the unit tests.

use std::{collections::VecDeque, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    analyzer::Analyzer,
    error::GeminiError,
    gateway::{ModelBackend, ModelRequest, ModelResponse, OutputPart, Sleeper},
    models::{Attachment, DeckInput, Outline, RenderedSlide, SlideSpec, StyleDescriptor},
    renderer::Renderer,
};

pub fn text_response(text: &str) -> ModelResponse {
    ModelResponse { parts: vec![OutputPart::Text(text.to_string())] }
}

pub fn image_response(data: &str) -> ModelResponse {
    ModelResponse { parts: vec![OutputPart::Attachment(Attachment { data: data.to_string(), mime_type: "image/png".into() })] }
}

/// Replays canned results in order and records every request.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<ModelResponse, GeminiError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<ModelResponse, GeminiError>>) -> Self {
        Self { script: Mutex::new(script.into()), requests: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize { self.requests.lock().len() }

    pub fn last_request(&self) -> Option<ModelRequest> { self.requests.lock().last().cloned() }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, GeminiError> {
        self.requests.lock().push(request.clone());
        self.script.lock().pop_front().unwrap_or_else(|| Err(GeminiError::Other("script exhausted".into())))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn recorded(&self) -> Vec<Duration> { self.slept.lock().clone() }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) { self.slept.lock().push(duration) }
}

pub struct StubAnalyzer {
    outcome: Mutex<Option<Result<Outline, GeminiError>>>,
    calls: Mutex<usize>,
}

impl StubAnalyzer {
    pub fn returning(outline: Outline) -> Self {
        Self { outcome: Mutex::new(Some(Ok(outline))), calls: Mutex::new(0) }
    }

    pub fn failing(error: GeminiError) -> Self {
        Self { outcome: Mutex::new(Some(Err(error))), calls: Mutex::new(0) }
    }

    pub fn calls(&self) -> usize { *self.calls.lock() }
}

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze(&self, _input: &DeckInput) -> Result<Outline, GeminiError> {
        *self.calls.lock() += 1;
        self.outcome.lock().take().unwrap_or_else(|| Err(GeminiError::Other("analyzed twice".into())))
    }
}

/// Echoes the slide title back; optionally fails on one call index.
pub struct StubRenderer {
    fail_at: Option<usize>,
    rendered: Mutex<Vec<String>>,
}

impl StubRenderer {
    pub fn succeeding() -> Self { Self { fail_at: None, rendered: Mutex::new(Vec::new()) } }

    pub fn failing_at(index: usize) -> Self { Self { fail_at: Some(index), rendered: Mutex::new(Vec::new()) } }

    pub fn calls(&self) -> usize { self.rendered.lock().len() }

    pub fn rendered_titles(&self) -> Vec<String> { self.rendered.lock().clone() }
}

#[async_trait]
impl Renderer for StubRenderer {
    async fn render(&self, spec: &SlideSpec, style: &StyleDescriptor) -> Result<RenderedSlide, GeminiError> {
        let index = {
            let mut rendered = self.rendered.lock();
            rendered.push(spec.title.clone());
            rendered.len() - 1
        };
        if self.fail_at == Some(index) {
            return Err(GeminiError::Blocked("Generation blocked: refused".into()));
        }
        Ok(RenderedSlide {
            image_url: Some(format!("data:image/png;base64,{}", spec.title)),
            text: Some(style.id.clone()),
            title: Some(spec.title.clone()),
        })
    }
}
