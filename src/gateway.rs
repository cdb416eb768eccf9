//! Single entry point for model calls.
//!
//! Every request goes through [`Gateway::call`], which retries transient overload
//! failures with exponential backoff and lets every other error through untouched.
//! The sleep is injected so the schedule can be checked without waiting on real time.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn, error};

use crate::{
    error::GeminiError,
    models::{AspectRatio, Attachment, RenderedSlide},
};

/// One input part of a model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Attachment(Attachment),
    Text(String),
}

impl Part {
    pub fn text(value: impl Into<String>) -> Self { Part::Text(value.into()) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputShape {
    /// Free-form text only.
    Text,
    /// Image (and optional commentary) in the given shape.
    Image { aspect_ratio: AspectRatio },
    /// JSON conforming to `schema`.
    Structured { schema: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseContract {
    pub shape: OutputShape,
    pub web_search: bool,
}

impl ResponseContract {
    pub fn text() -> Self { Self { shape: OutputShape::Text, web_search: false } }

    pub fn image(aspect_ratio: AspectRatio) -> Self {
        Self { shape: OutputShape::Image { aspect_ratio }, web_search: false }
    }

    pub fn structured(schema: Value) -> Self { Self { shape: OutputShape::Structured { schema }, web_search: false } }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub parts: Vec<Part>,
    pub contract: ResponseContract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPart {
    Attachment(Attachment),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub parts: Vec<OutputPart>,
}

impl ModelResponse {
    /// All text parts joined, or `None` when the model returned no text.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.parts.iter().filter_map(|p| match p {
            OutputPart::Text(t) => Some(t.as_str()),
            OutputPart::Attachment(_) => None,
        }).collect();
        if texts.is_empty() { None } else { Some(texts.concat()) }
    }

    /// The last image part, as the caller sees it when iterating in order.
    pub fn image(&self) -> Option<&Attachment> {
        self.parts.iter().rev().find_map(|p| match p {
            OutputPart::Attachment(a) => Some(a),
            OutputPart::Text(_) => None,
        })
    }
}

/// The hosted generative model capability.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, GeminiError>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) { tokio::time::sleep(duration).await }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retries: 2, initial_delay: Duration::from_millis(1000), multiplier: 2 }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_delay.saturating_mul(self.multiplier.saturating_pow(retry))
    }
}

pub struct Gateway {
    backend: Arc<dyn ModelBackend>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    image_model: String,
}

impl Gateway {
    pub fn new(backend: Arc<dyn ModelBackend>, sleeper: Arc<dyn Sleeper>, policy: RetryPolicy, image_model: impl Into<String>) -> Self {
        Self { backend, sleeper, policy, image_model: image_model.into() }
    }

    pub async fn call(&self, request: &ModelRequest) -> Result<ModelResponse, GeminiError> {
        let mut retry = 0;
        loop {
            match self.backend.generate(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_overload() && retry < self.policy.retries => {
                    let delay = self.policy.delay_for(retry);
                    warn!("⏳ {} overloaded ({}), retrying in {}ms", request.model, e, delay.as_millis());
                    self.sleeper.sleep(delay).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single-shot image generation, optionally editing `source`.
    ///
    /// A response with neither image nor text, or with text only, is treated as a refusal.
    pub async fn generate_image(&self, prompt: &str, source: Option<&Attachment>, aspect_ratio: AspectRatio) -> Result<RenderedSlide, GeminiError> {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = source {
            parts.push(Part::Attachment(image.clone()));
        }
        parts.push(Part::text(prompt));

        let request = ModelRequest {
            model: self.image_model.clone(),
            system_instruction: None,
            parts,
            contract: ResponseContract::image(aspect_ratio),
        };
        let response = self.call(&request).await?;

        let image_url = response.image().map(Attachment::to_data_url);
        let text = response.text();
        match (&image_url, &text) {
            (None, None) => {
                error!("❌ Image generation returned no content");
                Err(GeminiError::Blocked("The AI generation was blocked or returned no content. This is usually due to safety filters detecting sensitive subjects (e.g., real people/faces). Try adjusting your prompt to be more abstract.".into()))
            }
            (None, Some(refusal)) => {
                error!("❌ Image generation refused: {}", refusal);
                Err(GeminiError::Blocked(format!("Generation blocked: {refusal}")))
            }
            _ => {
                info!("✅ Image generated ({} aspect)", aspect_ratio.as_str());
                Ok(RenderedSlide { image_url, text, title: None })
            }
        }
    }
}
