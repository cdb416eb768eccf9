use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::{
    error::GeminiError,
    gateway::{ModelBackend, ModelRequest, ModelResponse, OutputPart, OutputShape, Part},
    models::Attachment,
};

pub const DEMO_KEY: &str = "DEMO_KEY";

// Helper function to truncate base64 data in JSON for cleaner logging
fn truncate_base64_in_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let Value::String(s) = val {
                        if s.len() > 100 && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=') {
                            *val = Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

fn loggable(value: &Value) -> String {
    let mut copy = value.clone();
    truncate_base64_in_json(&mut copy);
    serde_json::to_string(&copy).unwrap_or_default()
}

/// Gemini `generateContent` REST backend.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_demo(&self) -> bool { self.api_key == DEMO_KEY }

    pub fn build_request_body(request: &ModelRequest) -> Value {
        let parts: Vec<Value> = request.parts.iter().map(|p| match p {
            Part::Attachment(a) => json!({"inlineData": {"mimeType": a.mime_type, "data": a.data}}),
            Part::Text(t) => json!({"text": t}),
        }).collect();

        let generation_config = match &request.contract.shape {
            OutputShape::Text => json!({"temperature": 0.7, "topP": 0.95, "topK": 40}),
            OutputShape::Image { aspect_ratio } => json!({
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": {"aspectRatio": aspect_ratio.as_str()},
                "candidateCount": 1
            }),
            OutputShape::Structured { schema } => json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            }),
        };

        let mut body = json!({
            "contents": [{"parts": parts}],
            "generationConfig": generation_config,
        });
        if let Some(instruction) = &request.system_instruction {
            body["systemInstruction"] = json!({"parts": [{"text": instruction}]});
        }
        if request.contract.web_search {
            body["tools"] = json!([{"googleSearch": {}}]);
        }
        body
    }

    async fn perform_api_call(&self, request: &ModelRequest) -> Result<ModelResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent?key={}", self.base_url, request.model, self.api_key);
        info!("🔗 Making request to: {}", url.replace(&self.api_key, "***"));

        let body = Self::build_request_body(request);
        debug!("📤 Request body: {}", loggable(&body));

        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(GeminiError::Status { status: status.as_u16(), body: response_text });
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Decode(e.to_string()))?;
        let result = parsed.into_model_response();
        info!(
            "📥 Gemini returned {} part(s), image: {}",
            result.parts.len(),
            result.image().map(|a| a.mime_type.as_str()).unwrap_or("none")
        );
        Ok(result)
    }

    /// Offline stand-in: image requests get an SVG placeholder, everything else gets no text.
    fn demo_response(&self, request: &ModelRequest) -> ModelResponse {
        match request.contract.shape {
            OutputShape::Image { .. } => {
                let prompt = request.parts.iter().rev().find_map(|p| match p {
                    Part::Text(t) => Some(t.as_str()),
                    Part::Attachment(_) => None,
                }).unwrap_or_default();
                ModelResponse { parts: vec![OutputPart::Attachment(Attachment {
                    data: generate_placeholder_image(prompt),
                    mime_type: "image/svg+xml".to_string(),
                })] }
            }
            _ => ModelResponse::default(),
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, GeminiError> {
        if self.is_demo() {
            info!("Using demo mode - no real content generated");
            return Ok(self.demo_response(request));
        }
        self.perform_api_call(request).await
    }
}

/// Pulls the quoted headline out of a slide prompt, falling back to the prompt's opening words.
fn placeholder_title(prompt: &str) -> String {
    if let Some(rest) = prompt.split("Headline: \"").nth(1) {
        if let Some(title) = rest.split('"').next() {
            return title.to_string();
        }
    }
    prompt.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn generate_placeholder_image(prompt: &str) -> String {
    let palette = ["#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6"];
    let color = palette[prompt.len() % palette.len()];
    let title = escape_xml(&placeholder_title(prompt));

    let svg = format!(r#"<svg width="1280" height="720" xmlns="http://www.w3.org/2000/svg">
            <defs>
                <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
                    <stop offset="0%" style="stop-color:{color};stop-opacity:1" />
                    <stop offset="100%" style="stop-color:{color};stop-opacity:0.6" />
                </linearGradient>
            </defs>
            <rect width="1280" height="720" fill="url(#grad)" />
            <text x="640" y="360" font-family="Arial, sans-serif" font-size="56" font-weight="bold"
                  text-anchor="middle" fill="white">{title}</text>
            <text x="640" y="430" font-family="Arial, sans-serif" font-size="20"
                  text-anchor="middle" fill="white" opacity="0.8">Demo preview</text>
        </svg>"#);

    base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<WirePart> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePart {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData
    },
    Text { text: String },
    Other(Value)
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
    #[serde(rename = "mimeType", default)]
    mime_type: Option<String>,
}

impl GeminiResponse {
    /// Only the first candidate is considered.
    fn into_model_response(self) -> ModelResponse {
        let parts = self.candidates.into_iter().next()
            .map(|c| c.content.parts.into_iter().filter_map(|p| match p {
                WirePart::Inline { inline_data } => Some(OutputPart::Attachment(Attachment {
                    data: inline_data.data,
                    mime_type: inline_data.mime_type.filter(|m| !m.is_empty()).unwrap_or_else(|| "image/png".to_string()),
                })),
                WirePart::Text { text } => Some(OutputPart::Text(text)),
                WirePart::Other(_) => None,
            }).collect::<Vec<_>>())
            .unwrap_or_default();
        ModelResponse { parts }
    }
}
