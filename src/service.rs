use std::sync::Arc;

use crate::{
    analyzer::ContentAnalyzer,
    config::Config,
    deck::{CancelFlag, DeckOrchestrator, ProgressSink},
    error::{DeckError, GeminiError},
    gateway::{Gateway, ModelBackend, Sleeper, TokioSleeper},
    gemini::GeminiClient,
    models::{AspectRatio, Attachment, DeckInput, DeckResult, RenderedSlide, SlideSpec, StyleDescriptor},
    optimizer::PromptOptimizer,
    renderer::SlideRenderer,
};

/// The operations exposed to the outer layers.
pub struct StudioService {
    gateway: Arc<Gateway>,
    optimizer: PromptOptimizer,
    orchestrator: DeckOrchestrator,
}

impl StudioService {
    pub fn from_config(config: &Config) -> Self {
        let backend = Arc::new(GeminiClient::new(config.api_key.clone(), config.api_base.clone()));
        Self::new(backend, Arc::new(TokioSleeper), config)
    }

    pub fn new(backend: Arc<dyn ModelBackend>, sleeper: Arc<dyn Sleeper>, config: &Config) -> Self {
        let gateway = Arc::new(Gateway::new(backend, sleeper.clone(), config.retry, config.image_model.clone()));
        let analyzer = Arc::new(ContentAnalyzer::new(gateway.clone(), config.text_model.clone()));
        let renderer = Arc::new(SlideRenderer::new(gateway.clone()));
        Self {
            optimizer: PromptOptimizer::new(gateway.clone(), config.text_model.clone()),
            orchestrator: DeckOrchestrator::new(analyzer, renderer, sleeper, config.slide_delay),
            gateway,
        }
    }

    pub async fn optimize_prompt(&self, prompt: &str) -> String {
        self.optimizer.optimize(prompt).await
    }

    pub async fn generate_image(&self, prompt: &str, source: Option<&Attachment>, aspect_ratio: AspectRatio) -> Result<RenderedSlide, GeminiError> {
        self.gateway.generate_image(prompt, source, aspect_ratio).await
    }

    pub async fn generate_pitch_deck(
        &self,
        input: &DeckInput,
        style: &StyleDescriptor,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<DeckResult, DeckError> {
        self.orchestrator.generate_deck(input, style, progress, cancel).await
    }

    pub async fn generate_single_slide(&self, spec: &SlideSpec, style: &StyleDescriptor) -> RenderedSlide {
        self.orchestrator.regenerate_slide(spec, style).await
    }
}
