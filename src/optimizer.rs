use std::sync::Arc;

use tracing::{error, info};

use crate::gateway::{Gateway, ModelRequest, Part, ResponseContract};

/// Rewrites a short user prompt into a detailed image prompt. Advisory: never fails.
pub struct PromptOptimizer {
    gateway: Arc<Gateway>,
    model: String,
}

impl PromptOptimizer {
    pub fn new(gateway: Arc<Gateway>, model: impl Into<String>) -> Self {
        Self { gateway, model: model.into() }
    }

    fn instruction(original: &str) -> String {
        format!(
            "You are an expert prompt engineer for AI Image Generators.
Rewrite the following user prompt to be highly detailed, artistic, and professional.
Focus on lighting, composition, texture, color palette, and mood.
Keep the intent of the user but make it \"world-class design\" quality.

User Prompt: \"{original}\"

Output ONLY the rewritten prompt string. Do not add markdown or explanations."
        )
    }

    /// Returns the rewritten prompt, or `original` unchanged on any failure or empty reply.
    pub async fn optimize(&self, original: &str) -> String {
        let request = ModelRequest {
            model: self.model.clone(),
            system_instruction: None,
            parts: vec![Part::Text(Self::instruction(original))],
            contract: ResponseContract::text(),
        };
        match self.gateway.call(&request).await {
            Ok(response) => match response.text().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
                Some(optimized) => {
                    info!("✨ Prompt optimized ({} -> {} chars)", original.len(), optimized.len());
                    optimized
                }
                None => original.to_string(),
            },
            Err(e) => {
                error!("❌ Prompt optimization failed: {}", e);
                original.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeminiError;
    use crate::gateway::RetryPolicy;
    use crate::testing::{text_response, RecordingSleeper, ScriptedBackend};
    use pretty_assertions::assert_eq;

    fn optimizer(backend: Arc<ScriptedBackend>) -> PromptOptimizer {
        let gateway = Gateway::new(backend, Arc::new(RecordingSleeper::default()), RetryPolicy::default(), "img");
        PromptOptimizer::new(Arc::new(gateway), "text-model")
    }

    #[tokio::test]
    async fn returns_trimmed_rewrite() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("  A golden-hour latte, shallow depth of field \n"))]));
        let out = optimizer(backend.clone()).optimize("coffee").await;
        assert_eq!(out, "A golden-hour latte, shallow depth of field");

        let request = backend.last_request().unwrap();
        assert_eq!(request.model, "text-model");
        assert!(matches!(&request.parts[0], Part::Text(t) if t.contains("User Prompt: \"coffee\"")));
    }

    #[tokio::test]
    async fn failure_returns_original() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(GeminiError::Transport("connection reset".into()))]));
        assert_eq!(optimizer(backend).optimize("coffee").await, "coffee");
    }

    #[tokio::test]
    async fn empty_reply_returns_original() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("   "))]));
        assert_eq!(optimizer(backend).optimize("coffee").await, "coffee");
    }
}
