use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::GeminiError,
    gateway::Gateway,
    models::{AspectRatio, RenderedSlide, SlideSpec, StyleDescriptor},
};

pub const SLIDE_ASPECT: AspectRatio = AspectRatio::Wide;

/// Renders one outline entry under a deck style. Errors are left to the caller to isolate.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, spec: &SlideSpec, style: &StyleDescriptor) -> Result<RenderedSlide, GeminiError>;
}

pub struct SlideRenderer {
    gateway: Arc<Gateway>,
}

impl SlideRenderer {
    pub fn new(gateway: Arc<Gateway>) -> Self { Self { gateway } }

    pub fn build_prompt(spec: &SlideSpec, style: &StyleDescriptor) -> String {
        format!(
            "Create a high-quality presentation slide image.

DESIGN SPECIFICATIONS:
{}

SLIDE CONTENT:
Headline: \"{}\"
Body Copy: \"{}\"

VISUAL SCENE:
{}

CRITICAL:
- The text MUST be legible, spelled correctly, and integrated into the design.
- Do not produce a generic \"slide in a computer screen\" image. Generate the slide graphic itself (flat).
- Respect the margins and whitespace defined in the style.
- If regenerating, try a slightly different variation of the same concept.",
            style.prompt_modifier, spec.title, spec.body, spec.visual_prompt
        )
    }
}

#[async_trait]
impl Renderer for SlideRenderer {
    async fn render(&self, spec: &SlideSpec, style: &StyleDescriptor) -> Result<RenderedSlide, GeminiError> {
        info!("🎯 Rendering slide '{}' in style '{}'", spec.title, style.id);
        let prompt = Self::build_prompt(spec, style);
        let mut slide = self.gateway.generate_image(&prompt, None, SLIDE_ASPECT).await?;
        slide.title = Some(spec.title.clone());
        Ok(slide)
    }
}
