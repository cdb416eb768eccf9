use axum::{
    Json, Router,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::{collections::HashMap, sync::Arc};
use parking_lot::RwLock;
use uuid::Uuid;
use chrono::Utc;

use crate::{
    deck::{CancelFlag, DeckProgress},
    error::{DeckError, GeminiError},
    history::{HistoryStore, HISTORY_LIMIT},
    models::{AppMode, Attachment, DeckInput, DeckRecord, DeckRequest, HistoryEntry, ImageRequest, OptimizeRequest, RenderedSlide, StyleDescriptor, PresetTemplate},
    pdf::generate_pdf,
    presets::{deck_styles, find_style, prompt_templates},
    service::StudioService,
};

/// Decks kept for fetch, regeneration and export; the oldest is dropped first.
pub const DECK_LIMIT: usize = HISTORY_LIMIT;

#[derive(Clone)]
pub struct AppState {
    pub decks: Arc<RwLock<HashMap<Uuid, DeckRecord>>>,
    pub history: Arc<dyn HistoryStore>,
    pub studio: Arc<StudioService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/styles", get(list_styles))
        .route("/api/templates", get(list_templates))
        .route("/api/prompt/optimize", post(optimize_prompt))
        .route("/api/image", post(generate_image))
        .route("/api/deck", post(generate_deck))
        .route("/api/deck/:id", get(get_deck))
        .route("/api/deck/:id/slides/:index/regenerate", post(regenerate_slide))
        .route("/api/deck/:id/pdf", get(export_pdf))
        .route("/api/history", get(list_history))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self { Self { status, message: message.into() } }

    fn not_found(what: &str) -> Self { Self::new(StatusCode::NOT_FOUND, format!("{what} not found")) }
}

impl From<GeminiError> for ApiError {
    fn from(e: GeminiError) -> Self { Self::new(StatusCode::BAD_GATEWAY, e.to_string()) }
}

impl From<DeckError> for ApiError {
    fn from(e: DeckError) -> Self {
        match e {
            DeckError::Cancelled => Self::new(StatusCode::CONFLICT, e.to_string()),
            DeckError::Analysis(_) => Self::new(StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}

fn store_deck(decks: &mut HashMap<Uuid, DeckRecord>, record: DeckRecord) {
    decks.insert(record.id, record);
    while decks.len() > DECK_LIMIT {
        let Some(oldest) = decks.values().min_by_key(|d| d.created_at).map(|d| d.id) else { break };
        tracing::info!("🗑️ Evicting deck {}", oldest);
        decks.remove(&oldest);
    }
}

fn style_by_id(id: &str) -> Result<StyleDescriptor, ApiError> {
    find_style(id).ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, format!("unknown style '{id}'")))
}

pub async fn list_styles() -> Json<Vec<StyleDescriptor>> { Json(deck_styles()) }

pub async fn list_templates() -> Json<Vec<PresetTemplate>> { Json(prompt_templates()) }

pub async fn optimize_prompt(State(state): State<AppState>, Json(body): Json<OptimizeRequest>) -> Json<OptimizeRequest> {
    let prompt = state.studio.optimize_prompt(&body.prompt).await;
    Json(OptimizeRequest { prompt })
}

pub async fn generate_image(State(state): State<AppState>, Json(body): Json<ImageRequest>) -> Result<Json<RenderedSlide>, ApiError> {
    if body.prompt.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "prompt must not be empty"));
    }
    let source = body.source_image.as_deref().map(|s| Attachment::from_data_url(s, body.source_mime_type.as_deref()));
    let mode = if source.is_some() { AppMode::Transform } else { AppMode::Generate };

    tracing::info!("🚀 Generating {:?} image ({})", mode, body.aspect_ratio.as_str());
    let result = state.studio.generate_image(&body.prompt, source.as_ref(), body.aspect_ratio).await?;

    state.history.persist(HistoryEntry {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        mode,
        prompt: body.prompt,
        results: vec![result.clone()],
        strategy: None,
    });
    Ok(Json(result))
}

pub async fn generate_deck(State(state): State<AppState>, Json(body): Json<DeckRequest>) -> Result<Json<DeckRecord>, ApiError> {
    let style = style_by_id(&body.style_id)?;
    let input = DeckInput::from_parts(body.input_kind, body.input, body.documents, body.audio);
    let label = input.label();

    tracing::info!("🚀 Generating pitch deck for: {}", label);
    let progress = |p: &DeckProgress| tracing::info!("📊 {}", p);
    let deck = state.studio.generate_pitch_deck(&input, &style, &progress, &CancelFlag::new()).await?;

    let now = Utc::now();
    let record = DeckRecord { id: Uuid::new_v4(), label, style, deck, created_at: now, updated_at: now };
    store_deck(&mut state.decks.write(), record.clone());
    state.history.persist(HistoryEntry {
        id: record.id,
        timestamp: now,
        mode: AppMode::Deck,
        prompt: record.label.clone(),
        results: record.deck.results.clone(),
        strategy: record.deck.strategy.clone(),
    });
    Ok(Json(record))
}

pub async fn get_deck(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<DeckRecord>, ApiError> {
    state.decks.read().get(&id).cloned().map(Json).ok_or_else(|| ApiError::not_found("deck"))
}

pub async fn regenerate_slide(
    Path((id, index)): Path<(Uuid, usize)>,
    State(state): State<AppState>,
) -> Result<Json<RenderedSlide>, ApiError> {
    let (spec, style) = {
        let guard = state.decks.read();
        let record = guard.get(&id).ok_or_else(|| ApiError::not_found("deck"))?;
        let spec = record.deck.raw_slides.get(index).cloned().ok_or_else(|| ApiError::not_found("slide"))?;
        (spec, record.style.clone())
    };

    tracing::info!("🔄 Regenerating slide {} ('{}') of deck {}", index, spec.title, id);
    // Render outside the lock
    let slide = state.studio.generate_single_slide(&spec, &style).await;

    let mut guard = state.decks.write();
    let record = guard.get_mut(&id).ok_or_else(|| ApiError::not_found("deck"))?;
    if let Some(existing) = record.deck.results.get_mut(index) {
        *existing = slide.clone();
        record.updated_at = Utc::now();
    }
    Ok(Json(slide))
}

pub async fn export_pdf(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Response, ApiError> {
    let record = state.decks.read().get(&id).cloned().ok_or_else(|| ApiError::not_found("deck"))?;
    let pdf_bytes = generate_pdf(&record).map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"pitch_deck_{id}.pdf\""))
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok((StatusCode::OK, headers, pdf_bytes).into_response())
}

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.load_all())
}
