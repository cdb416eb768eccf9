use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::GeminiError,
    gateway::{Gateway, ModelRequest, Part, ResponseContract},
    models::{DeckInput, Outline},
    outline,
};

/// Turns deck input into the fixed-length outline.
///
/// Only unrecoverable call failures are returned as errors; malformed output is
/// replaced by the default outline.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, input: &DeckInput) -> Result<Outline, GeminiError>;
}

pub struct ContentAnalyzer {
    gateway: Arc<Gateway>,
    model: String,
}

impl ContentAnalyzer {
    pub fn new(gateway: Arc<Gateway>, model: impl Into<String>) -> Self {
        Self { gateway, model: model.into() }
    }

    pub fn build_request(&self, input: &DeckInput) -> ModelRequest {
        let mut parts = Vec::new();
        match input {
            DeckInput::Audio(recording) => {
                parts.push(Part::Attachment(recording.clone()));
                parts.push(Part::text("Listen to this audio recording and extract the key pitch deck information from it."));
            }
            DeckInput::Documents { files, note } => {
                parts.extend(files.iter().cloned().map(Part::Attachment));
                let mut instruction = if files.len() == 1 {
                    "Analyze this document to create a pitch deck.".to_string()
                } else {
                    format!("Analyze these {} documents together and synthesize a single pitch deck from all of them.", files.len())
                };
                if !note.trim().is_empty() {
                    instruction.push_str(&format!(" Additional context: {}", note.trim()));
                }
                parts.push(Part::Text(instruction));
            }
            DeckInput::Url(target) => {
                parts.push(Part::Text(format!("Research this website/company: {target}. Create a pitch deck structure based on what you find.")));
            }
            DeckInput::Topic(topic) => {
                parts.push(Part::Text(format!("Create a pitch deck based on this topic: {topic}")));
            }
        }

        ModelRequest {
            model: self.model.clone(),
            system_instruction: Some(outline::system_instruction()),
            parts,
            contract: ResponseContract::structured(outline::response_schema())
                .with_web_search(matches!(input, DeckInput::Url(_))),
        }
    }
}

#[async_trait]
impl Analyzer for ContentAnalyzer {
    async fn analyze(&self, input: &DeckInput) -> Result<Outline, GeminiError> {
        info!("🧭 Analyzing {:?} input for deck structure", input.kind());
        let request = self.build_request(input);
        let response = self.gateway.call(&request).await?;
        let result = outline::decode_outline(response.text().as_deref(), input.text());
        info!("✅ Outline ready with {} slides", result.slides.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{OutputShape, RetryPolicy};
    use crate::models::{Attachment, InputKind};
    use crate::outline::{SLIDE_COUNT, TEAM_INDEX};
    use crate::testing::{text_response, RecordingSleeper, ScriptedBackend};
    use pretty_assertions::assert_eq;

    fn analyzer(backend: Arc<ScriptedBackend>) -> ContentAnalyzer {
        let gateway = Gateway::new(backend, Arc::new(RecordingSleeper::default()), RetryPolicy::default(), "img");
        ContentAnalyzer::new(Arc::new(gateway), "text-model")
    }

    fn pdf(data: &str) -> Attachment { Attachment { data: data.into(), mime_type: "application/pdf".into() } }

    #[test]
    fn only_url_input_enables_web_search() {
        let a = analyzer(Arc::new(ScriptedBackend::new(vec![])));
        let inputs = [
            DeckInput::Topic("cups".into()),
            DeckInput::Url("acme.com".into()),
            DeckInput::Audio(Attachment { data: "AA".into(), mime_type: "audio/webm".into() }),
            DeckInput::Documents { files: vec![pdf("A")], note: String::new() },
        ];
        let searched: Vec<bool> = inputs.iter().map(|i| a.build_request(i).contract.web_search).collect();
        assert_eq!(searched, vec![false, true, false, false]);
    }

    #[test]
    fn documents_become_attachments_before_instruction() {
        let a = analyzer(Arc::new(ScriptedBackend::new(vec![])));
        let input = DeckInput::Documents { files: vec![pdf("A"), pdf("B")], note: "focus on B2B".into() };
        let request = a.build_request(&input);

        assert_eq!(request.model, "text-model");
        assert_eq!(request.parts.len(), 3);
        assert_eq!(request.parts[0], Part::Attachment(pdf("A")));
        assert_eq!(request.parts[1], Part::Attachment(pdf("B")));
        match &request.parts[2] {
            Part::Text(t) => {
                assert!(t.contains("2 documents"));
                assert!(t.ends_with("Additional context: focus on B2B"));
            }
            other => panic!("unexpected part {other:?}"),
        }
        assert!(matches!(request.contract.shape, OutputShape::Structured { .. }));
    }

    #[tokio::test]
    async fn every_input_kind_yields_full_outline_on_bad_output() {
        for kind in [InputKind::Topic, InputKind::Documents, InputKind::Url, InputKind::Audio] {
            let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("Sorry, I cannot help with that."))]));
            let input = DeckInput::from_parts(
                kind,
                "cups".into(),
                vec![pdf("A")],
                Some(Attachment { data: "AA".into(), mime_type: "audio/webm".into() }),
            );
            let outline = analyzer(backend).analyze(&input).await.unwrap();
            assert_eq!(outline.slides.len(), SLIDE_COUNT);
            assert!(outline.strategy.is_some());
        }
    }

    #[tokio::test]
    async fn fallback_title_ignores_attachment_labels() {
        let inputs = [
            DeckInput::Documents { files: vec![pdf("A"), pdf("B")], note: String::new() },
            DeckInput::Audio(Attachment { data: "AA".into(), mime_type: "audio/webm".into() }),
        ];
        for input in inputs {
            let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("no json here"))]));
            let outline = analyzer(backend).analyze(&input).await.unwrap();
            assert_eq!(outline.slides[0].body, "My Presentation");
        }

        let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("no json here"))]));
        let input = DeckInput::Documents { files: vec![pdf("A")], note: "Solar kiosks".into() };
        let outline = analyzer(backend).analyze(&input).await.unwrap();
        assert_eq!(outline.slides[0].body, "Solar kiosks");
    }

    #[tokio::test]
    async fn call_failure_is_returned() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(GeminiError::Status { status: 401, body: "bad key".into() })]));
        let err = analyzer(backend).analyze(&DeckInput::Topic("cups".into())).await.unwrap_err();
        assert!(err.to_string().contains("bad key"));
    }

    #[tokio::test]
    async fn model_outline_is_used_when_valid() {
        let slides: Vec<serde_json::Value> = (0..SLIDE_COUNT)
            .map(|i| serde_json::json!({"title": format!("S{i}"), "body": "b", "visualPrompt": "abstract shapes"}))
            .collect();
        let body = serde_json::json!({
            "slides": slides,
            "strategy": {
                "summary": "s",
                "swot": {"strengths": [], "weaknesses": [], "opportunities": [], "threats": []},
                "marketStrategy": "m",
                "actionPlan": {"immediate": [], "midTerm": [], "longTerm": []}
            }
        });
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response(&body.to_string()))]));
        let outline = analyzer(backend).analyze(&DeckInput::Topic("cups".into())).await.unwrap();
        assert_eq!(outline.slides[3].title, "S3");
        assert_eq!(outline.slides[TEAM_INDEX].visual_prompt, "abstract shapes");
        assert_eq!(outline.strategy.unwrap().market_strategy, "m");
    }
}
