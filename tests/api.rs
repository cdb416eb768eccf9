use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use deck_studio::{
    config::Config,
    history::InMemoryHistory,
    routes::{router, AppState, DECK_LIMIT},
    service::StudioService,
};

/// Demo-mode app: no network, placeholder images, no pause between slides.
fn demo_app() -> Router {
    let config = Config { slide_delay: Duration::ZERO, ..Config::default() };
    router(AppState {
        decks: Arc::default(),
        history: Arc::new(InMemoryHistory::default()),
        studio: Arc::new(StudioService::from_config(&config)),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn generate_fetch_regenerate_and_export_deck() {
    let app = demo_app();

    let (status, deck) = send_json(&app, "POST", "/api/deck", Some(json!({
        "input_kind": "topic",
        "input": "biodegradable coffee cups startup",
        "style_id": "eco-modern"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    let results = deck["deck"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 12);
    assert_eq!(deck["deck"]["rawSlides"].as_array().unwrap().len(), 12);
    assert!(results.iter().all(|r| r["imageUrl"].as_str().unwrap().starts_with("data:image/svg+xml;base64,")));
    assert_eq!(deck["deck"]["rawSlides"][0]["body"], "biodegradable coffee cups startup");
    assert_eq!(deck["style"]["id"], "eco-modern");

    let id = deck["id"].as_str().unwrap().to_string();

    let (status, fetched) = send_json(&app, "GET", &format!("/api/deck/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["label"], "biodegradable coffee cups startup");

    let (status, slide) = send_json(&app, "POST", &format!("/api/deck/{id}/slides/3/regenerate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slide["title"], deck["deck"]["rawSlides"][3]["title"]);

    let (status, _) = send_json(&app, "POST", &format!("/api/deck/{id}/slides/12/regenerate"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, pdf) = send(&app, "GET", &format!("/api/deck/{id}/pdf"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pdf.starts_with(b"%PDF"));

    let (_, history) = send_json(&app, "GET", "/api/history", None).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["mode"], "deck");
}

#[tokio::test]
async fn unknown_style_is_rejected() {
    let app = demo_app();
    let (status, body) = send_json(&app, "POST", "/api/deck", Some(json!({
        "input_kind": "url",
        "input": "acme.com",
        "style_id": "glass-light"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("glass-light"));
}

#[tokio::test]
async fn optimize_keeps_prompt_when_model_gives_nothing() {
    let app = demo_app();
    let (status, body) = send_json(&app, "POST", "/api/prompt/optimize", Some(json!({"prompt": "a cat"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt"], "a cat");
}

#[tokio::test]
async fn single_image_is_recorded_in_history() {
    let app = demo_app();
    let (status, image) = send_json(&app, "POST", "/api/image", Some(json!({
        "prompt": "Grand opening flyer",
        "source_image": "data:image/jpeg;base64,AAAA",
        "aspect_ratio": "9:16"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(image["imageUrl"].as_str().is_some());

    let (_, history) = send_json(&app, "GET", "/api/history", None).await;
    assert_eq!(history[0]["mode"], "transform");
}

#[tokio::test]
async fn catalogs_are_listed() {
    let app = demo_app();
    let (_, styles) = send_json(&app, "GET", "/api/styles", None).await;
    assert_eq!(styles.as_array().unwrap().len(), 5);
    let (_, templates) = send_json(&app, "GET", "/api/templates", None).await;
    assert_eq!(templates.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn oldest_deck_is_evicted_past_limit() {
    let app = demo_app();
    let mut ids = Vec::new();
    for i in 0..=DECK_LIMIT {
        let (status, deck) = send_json(&app, "POST", "/api/deck", Some(json!({
            "input_kind": "topic",
            "input": format!("startup {i}"),
            "style_id": "swiss-minimal"
        }))).await;
        assert_eq!(status, StatusCode::OK);
        ids.push(deck["id"].as_str().unwrap().to_string());
    }

    let (status, _) = send_json(&app, "GET", &format!("/api/deck/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for id in &ids[1..] {
        let (status, _) = send_json(&app, "GET", &format!("/api/deck/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn missing_deck_is_404() {
    let app = demo_app();
    let (status, _) = send_json(&app, "GET", "/api/deck/00000000-0000-0000-0000-000000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
