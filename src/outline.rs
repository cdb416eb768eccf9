//! The fixed pitch-deck outline and the parse-or-default decode step for analysis output.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::models::{Outline, SlideSpec, StrategyReport};

pub struct Section {
    pub name: &'static str,
    pub guidance: &'static str,
}

pub const SECTIONS: [Section; 12] = [
    Section { name: "Title Slide", guidance: "Company Name & Tagline" },
    Section { name: "The Problem", guidance: "What pain point are they solving?" },
    Section { name: "The Solution", guidance: "Product/Service description" },
    Section { name: "Why Now?", guidance: "Timing and trends" },
    Section { name: "Market Size", guidance: "TAM/SAM/SOM or opportunity" },
    Section { name: "Product Detail", guidance: "Key features or tech" },
    Section { name: "Business Model", guidance: "How they make money" },
    Section { name: "Competition", guidance: "Landscape and advantage" },
    Section { name: "Go-to-Market Strategy", guidance: "Marketing & Sales" },
    Section { name: "Traction/Financials", guidance: "Milestones or projections" },
    Section { name: "The Team", guidance: "Key roles or structure" },
    Section { name: "The Vision/Ask", guidance: "Closing statement or roadmap" },
];

pub const SLIDE_COUNT: usize = SECTIONS.len();
pub const TEAM_INDEX: usize = 10;

const TEAM_VISUAL: &str = "Team structure visualization using abstract minimalist avatars and geometric silhouettes, stylized flat illustration";
const TEAM_DIRECTIVE: &str = "Represent every team member as an abstract avatar or geometric silhouette in a stylized illustration.";

// Whole words, matched case-insensitively against the Team slide's visual prompt.
const FORBIDDEN_TEAM_WORDS: [&str; 14] = [
    "photorealistic", "photo", "photos", "photograph", "photographs", "photography", "photographic",
    "portrait", "portraits", "headshot", "headshots", "realistic", "face", "faces",
];
// Substrings; "illustrat" covers illustration and illustrated.
const ABSTRACT_TEAM_TERMS: [&str; 5] = ["abstract", "geometric silhouette", "minimalist icon", "stylized", "illustrat"];

/// JSON schema handed to the model for the combined outline + strategy output.
pub fn response_schema() -> Value {
    let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    json!({
        "type": "OBJECT",
        "properties": {
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {"type": "STRING"},
                        "body": {"type": "STRING"},
                        "visualPrompt": {"type": "STRING"}
                    },
                    "required": ["title", "body", "visualPrompt"]
                }
            },
            "strategy": {
                "type": "OBJECT",
                "properties": {
                    "summary": {"type": "STRING"},
                    "swot": {
                        "type": "OBJECT",
                        "properties": {
                            "strengths": string_list,
                            "weaknesses": string_list,
                            "opportunities": string_list,
                            "threats": string_list
                        },
                        "required": ["strengths", "weaknesses", "opportunities", "threats"]
                    },
                    "marketStrategy": {"type": "STRING"},
                    "actionPlan": {
                        "type": "OBJECT",
                        "properties": {
                            "immediate": string_list,
                            "midTerm": string_list,
                            "longTerm": string_list
                        },
                        "required": ["immediate", "midTerm", "longTerm"]
                    }
                },
                "required": ["summary", "swot", "marketStrategy", "actionPlan"]
            }
        },
        "required": ["slides", "strategy"]
    })
}

pub fn system_instruction() -> String {
    let sections = SECTIONS.iter().enumerate()
        .map(|(i, s)| format!("  {}. {} ({})", i + 1, s.name, s.guidance))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a world-class venture capital presentation consultant and business strategist.
Extract the key information from the provided context and structure it into exactly {SLIDE_COUNT} slides for a comprehensive pitch deck, in this order:
{sections}

For each slide, provide:
- title: the headline for the slide (keep it short, max 5 words).
- body: ONE or TWO powerful sentences max, no bullet points (max 20 words).
- visualPrompt: a highly specific description of the visual scene: layout, where the text goes, and the background imagery.

Also produce a strategy report:
- summary: an executive summary of the business.
- swot: strengths, weaknesses, opportunities and threats as short string lists.
- marketStrategy: a short narrative of how to win the market.
- actionPlan: immediate, midTerm and longTerm string lists.

CRITICAL SAFETY INSTRUCTION:
For slide {} (The Team), the visualPrompt MUST request abstract avatars, minimalist icons, geometric silhouettes or stylized character illustrations to represent team members.
Never ask for photorealistic people, photos of faces, portraits of humans or realistic staff photos. Keep the team visualization abstract and artistic.",
        TEAM_INDEX + 1
    )
}

/// Removes a surrounding markdown code fence (```` ``` ```` or ```` ```json ````) if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else { return trimmed };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Deserialize)]
struct RawOutline {
    slides: Vec<SlideSpec>,
    strategy: StrategyReport,
}

/// Strict decode: the text must hold the full slide list and a complete strategy report.
pub fn parse_outline(text: &str) -> Result<Outline, String> {
    let raw: RawOutline = serde_json::from_str(strip_code_fence(text)).map_err(|e| e.to_string())?;
    if raw.slides.len() != SLIDE_COUNT {
        return Err(format!("expected {SLIDE_COUNT} slides, got {}", raw.slides.len()));
    }
    let mut slides = raw.slides;
    enforce_team_safety(&mut slides[TEAM_INDEX]);
    Ok(Outline { slides, strategy: Some(raw.strategy) })
}

/// Parse-or-default. `topic` seeds the fallback title slide.
pub fn decode_outline(text: Option<&str>, topic: &str) -> Outline {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        warn!("⚠️ Analysis returned no text, using default outline");
        return default_outline(topic);
    };
    parse_outline(text).unwrap_or_else(|e| {
        warn!("⚠️ Failed to parse analysis response ({}), using default outline", e);
        default_outline(topic)
    })
}

fn requests_real_people(lower: &str) -> bool {
    lower.split(|c: char| !c.is_alphanumeric()).any(|word| FORBIDDEN_TEAM_WORDS.contains(&word))
}

pub fn team_prompt_is_safe(visual_prompt: &str) -> bool {
    let lower = visual_prompt.to_lowercase();
    !requests_real_people(&lower) && ABSTRACT_TEAM_TERMS.iter().any(|t| lower.contains(t))
}

/// Model drift on the Team slide is corrected here rather than left to the image model's filters.
pub fn enforce_team_safety(spec: &mut SlideSpec) {
    let lower = spec.visual_prompt.to_lowercase();
    if requests_real_people(&lower) {
        warn!("⚠️ Team slide visual prompt requested realistic people, replacing it");
        spec.visual_prompt = TEAM_VISUAL.to_string();
    } else if !team_prompt_is_safe(&spec.visual_prompt) {
        spec.visual_prompt = format!("{} {}", spec.visual_prompt.trim_end(), TEAM_DIRECTIVE);
    }
}

pub fn default_outline(topic: &str) -> Outline {
    let title_body = if topic.trim().is_empty() { "My Presentation" } else { topic.trim() };
    let slides = vec![
        SlideSpec::new("Title Slide", title_body, "A professional title slide with abstract geometric shapes"),
        SlideSpec::new("The Problem", "Defining the core issue", "Abstract representation of a problem or friction, dark tones"),
        SlideSpec::new("The Solution", "Our innovative solution", "Product shot or solution visualization in a clean environment, bright"),
        SlideSpec::new("Why Now", "Market timing is perfect", "Clock or timeline visualization, urgent and dynamic"),
        SlideSpec::new("Market Size", "Massive opportunity ahead", "Upward trending graph or map visualization, data driven"),
        SlideSpec::new("Product", "Seamless user experience", "App interface mockups or device renders, sleek"),
        SlideSpec::new("Business Model", "Sustainable revenue streams", "Abstract coin or flow chart visualization, organized"),
        SlideSpec::new("Competition", "Our unique advantage", "Chess pieces or race track metaphor, strategic"),
        SlideSpec::new("Go-to-Market", "Scaling strategy", "Network nodes or rocket launch imagery, expansive"),
        SlideSpec::new("Traction", "Key milestones achieved", "Mountain peak or flag planting, success oriented"),
        SlideSpec::new("Team", "Our experts", TEAM_VISUAL),
        SlideSpec::new("Vision", "Future outlook", "Futuristic and inspiring imagery, horizon or light"),
    ];
    Outline { slides, strategy: Some(StrategyReport::default()) }
}
