use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use base64::Engine;

/// One outline entry produced by content analysis.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlideSpec {
    pub title: String,
    #[serde(alias = "content")]
    pub body: String,
    pub visual_prompt: String,
}

impl SlideSpec {
    pub fn new(title: impl Into<String>, body: impl Into<String>, visual_prompt: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into(), visual_prompt: visual_prompt.into() }
    }
}

/// Result of one render. A failed render keeps `image_url = None` and explains itself in `text`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSlide {
    pub image_url: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl RenderedSlide {
    pub fn failed(title: &str, reason: impl Into<String>) -> Self {
        Self { image_url: None, text: Some(reason.into()), title: Some(title.to_string()) }
    }

    pub fn is_failed(&self) -> bool { self.image_url.is_none() }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PreviewColors {
    pub bg: String,
    pub text: String,
    pub accent: String,
    pub secondary: String,
}

/// A named visual style applied uniformly to every slide of a deck.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt_modifier: String,
    pub preview_colors: PreviewColors,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub immediate: Vec<String>,
    pub mid_term: Vec<String>,
    pub long_term: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub summary: String,
    pub swot: Swot,
    pub market_strategy: String,
    pub action_plan: ActionPlan,
}

/// Analysis output: the fixed-length slide list and the strategy report generated with it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Outline {
    pub slides: Vec<SlideSpec>,
    #[serde(default)]
    pub strategy: Option<StrategyReport>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeckResult {
    pub results: Vec<RenderedSlide>,
    pub raw_slides: Vec<SlideSpec>,
    pub strategy: Option<StrategyReport>,
}

/// Inline binary payload sent to the model (`inlineData` on the wire).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: String, // base64
    #[serde(default = "default_mime_type", alias = "mimeType")]
    pub mime_type: String,
}

fn default_mime_type() -> String { "application/octet-stream".to_string() }

impl Attachment {
    pub fn from_bytes(bytes: &[u8], mime_type: Option<&str>) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.filter(|m| !m.is_empty()).map(str::to_string).unwrap_or_else(default_mime_type),
        }
    }

    /// Accepts either a `data:<mime>;base64,<payload>` URL or bare base64.
    pub fn from_data_url(value: &str, fallback_mime: Option<&str>) -> Self {
        if let Some(rest) = value.strip_prefix("data:") {
            if let Some((header, payload)) = rest.split_once(',') {
                let mime = header.split(';').next().filter(|m| !m.is_empty());
                return Self {
                    data: payload.to_string(),
                    mime_type: mime.or(fallback_mime).map(str::to_string).unwrap_or_else(default_mime_type),
                };
            }
        }
        Self {
            data: value.to_string(),
            mime_type: fallback_mime.filter(|m| !m.is_empty()).map(str::to_string).unwrap_or_else(default_mime_type),
        }
    }

    pub fn to_data_url(&self) -> String { format!("data:{};base64,{}", self.mime_type, self.data) }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")] Square,
    #[serde(rename = "3:4")] Portrait,
    #[serde(rename = "4:3")] Landscape,
    #[serde(rename = "9:16")] Tall,
    #[serde(rename = "16:9")] Wide,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind { Topic, Documents, Url, Audio }

/// Exactly one payload shape is active per analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckInput {
    Topic(String),
    Documents { files: Vec<Attachment>, note: String },
    Url(String),
    Audio(Attachment),
}

impl DeckInput {
    /// Builds the payload for `kind`; document/audio requests missing their attachments degrade to a topic.
    pub fn from_parts(kind: InputKind, text: String, documents: Vec<Attachment>, audio: Option<Attachment>) -> Self {
        match (kind, audio) {
            (InputKind::Documents, _) if !documents.is_empty() => DeckInput::Documents { files: documents, note: text },
            (InputKind::Audio, Some(recording)) => DeckInput::Audio(recording),
            (InputKind::Url, _) => DeckInput::Url(text),
            _ => DeckInput::Topic(text),
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            DeckInput::Topic(_) => InputKind::Topic,
            DeckInput::Documents { .. } => InputKind::Documents,
            DeckInput::Url(_) => InputKind::Url,
            DeckInput::Audio(_) => InputKind::Audio,
        }
    }

    /// Short human label used for history and exports.
    /// Free text that came with the request; recordings carry none.
    pub fn text(&self) -> &str {
        match self {
            DeckInput::Topic(t) | DeckInput::Url(t) => t,
            DeckInput::Documents { note, .. } => note,
            DeckInput::Audio(_) => "",
        }
    }

    pub fn label(&self) -> String {
        match self {
            DeckInput::Topic(t) | DeckInput::Url(t) => t.clone(),
            DeckInput::Documents { files, note } if note.trim().is_empty() => format!("{} document(s)", files.len()),
            DeckInput::Documents { note, .. } => note.clone(),
            DeckInput::Audio(_) => "Voice note".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppMode { Transform, Generate, Deck }

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mode: AppMode,
    pub prompt: String,
    pub results: Vec<RenderedSlide>,
    #[serde(default)]
    pub strategy: Option<StrategyReport>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory { Social, Ecommerce, Lifestyle, Creative }

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresetTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub category: TemplateCategory,
    pub mode: AppMode,
    #[serde(default)]
    pub recommended_ratio: Option<AspectRatio>,
}

// --- HTTP request/response bodies ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OptimizeRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub source_image: Option<String>, // data URL or bare base64
    #[serde(default)]
    pub source_mime_type: Option<String>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeckRequest {
    pub input_kind: InputKind,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub documents: Vec<Attachment>,
    #[serde(default)]
    pub audio: Option<Attachment>,
    pub style_id: String,
}

/// A generated deck kept server-side so single slides can be regenerated later.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeckRecord {
    pub id: Uuid,
    pub label: String,
    pub style: StyleDescriptor,
    pub deck: DeckResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn data_url_prefix_is_stripped() {
        let a = Attachment::from_data_url("data:image/jpeg;base64,AAAA", None);
        assert_eq!(a.data, "AAAA");
        assert_eq!(a.mime_type, "image/jpeg");
        assert_eq!(a.to_data_url(), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn bare_base64_uses_fallback_mime() {
        let a = Attachment::from_data_url("QUJD", Some("application/pdf"));
        assert_eq!(a.mime_type, "application/pdf");
        let b = Attachment::from_bytes(b"ABC", None);
        assert_eq!(b.data, "QUJD");
        assert_eq!(b.mime_type, "application/octet-stream");
    }

    #[test]
    fn slide_spec_accepts_content_alias() {
        let spec: SlideSpec = serde_json::from_str(r#"{"title":"T","content":"C","visualPrompt":"V"}"#).unwrap();
        assert_eq!(spec, SlideSpec::new("T", "C", "V"));
    }

    #[test]
    fn missing_attachments_degrade_to_topic() {
        let input = DeckInput::from_parts(InputKind::Documents, "cups".into(), vec![], None);
        assert_eq!(input, DeckInput::Topic("cups".into()));
        let input = DeckInput::from_parts(InputKind::Audio, "cups".into(), vec![], None);
        assert_eq!(input.kind(), InputKind::Topic);
        let input = DeckInput::from_parts(InputKind::Url, "acme.com".into(), vec![], None);
        assert_eq!(input.kind(), InputKind::Url);
    }

    #[test]
    fn aspect_ratio_round_trips_as_ratio_string() {
        assert_eq!(serde_json::to_string(&AspectRatio::Wide).unwrap(), "\"16:9\"");
        let r: AspectRatio = serde_json::from_str("\"3:4\"").unwrap();
        assert_eq!(r.as_str(), "3:4");
    }
}
