//! Deck generation: one analysis call, then slides rendered strictly in order with a
//! fixed pause between render calls.
//!
//! Slides are rendered sequentially on purpose. Fanning out concurrently brings back
//! the overload failures the pause keeps away from the shared backend.

use std::{
    fmt,
    sync::{atomic::{AtomicBool, Ordering}, Arc},
    time::Duration,
};

use tracing::{info, warn};

use crate::{
    analyzer::Analyzer,
    error::DeckError,
    gateway::Sleeper,
    models::{DeckInput, DeckResult, RenderedSlide, SlideSpec, StyleDescriptor},
    renderer::Renderer,
};

pub const DEFAULT_SLIDE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckProgress {
    Analyzing,
    /// `current` is 1-based.
    Rendering { current: usize, total: usize },
}

impl fmt::Display for DeckProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckProgress::Analyzing => write!(f, "Analyzing content & structuring deck..."),
            DeckProgress::Rendering { current, total } => write!(f, "Generating Slide {current} of {total}..."),
        }
    }
}

/// Receives stage transitions synchronously, in generation order.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &DeckProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&DeckProgress) + Send + Sync,
{
    fn report(&self, progress: &DeckProgress) { self(progress) }
}

/// Cooperative cancellation shared between the caller and a running generation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed) }

    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

pub struct DeckOrchestrator {
    analyzer: Arc<dyn Analyzer>,
    renderer: Arc<dyn Renderer>,
    sleeper: Arc<dyn Sleeper>,
    slide_delay: Duration,
}

impl DeckOrchestrator {
    pub fn new(analyzer: Arc<dyn Analyzer>, renderer: Arc<dyn Renderer>, sleeper: Arc<dyn Sleeper>, slide_delay: Duration) -> Self {
        Self { analyzer, renderer, sleeper, slide_delay }
    }

    pub async fn generate_deck(
        &self,
        input: &DeckInput,
        style: &StyleDescriptor,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<DeckResult, DeckError> {
        check(cancel)?;
        progress.report(&DeckProgress::Analyzing);
        let outline = self.analyzer.analyze(input).await?;

        let total = outline.slides.len();
        let mut results = Vec::with_capacity(total);
        for (i, spec) in outline.slides.iter().enumerate() {
            check(cancel)?;
            progress.report(&DeckProgress::Rendering { current: i + 1, total });
            if i > 0 {
                self.sleeper.sleep(self.slide_delay).await;
                check(cancel)?;
            }
            results.push(self.render_isolated(spec, style).await);
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!("✅ Deck generated: {} slides, {} without image", total, failed);
        Ok(DeckResult { results, raw_slides: outline.slides, strategy: outline.strategy })
    }

    /// Re-renders one slide from its stored spec, outside any batch pacing.
    pub async fn regenerate_slide(&self, spec: &SlideSpec, style: &StyleDescriptor) -> RenderedSlide {
        self.render_isolated(spec, style).await
    }

    async fn render_isolated(&self, spec: &SlideSpec, style: &StyleDescriptor) -> RenderedSlide {
        match self.renderer.render(spec, style).await {
            Ok(slide) => slide,
            Err(e) => {
                warn!("⚠️ Failed to generate slide '{}': {}", spec.title, e);
                RenderedSlide::failed(&spec.title, format!("Image generation failed: {e}"))
            }
        }
    }
}

fn check(cancel: &CancelFlag) -> Result<(), DeckError> {
    if cancel.is_cancelled() { Err(DeckError::Cancelled) } else { Ok(()) }
}
