use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::history::{HistoryLog, HistoryRecord};
use crate::pipeline::{NewsError, NewsPipeline};
use crate::upstream::newsapi::NewsApiClient;
use crate::upstream::NewsSource;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<NewsPipeline>,
    history: Arc<HistoryLog>,
}

impl AppState {
    /// Production wiring: reqwest-backed NewsAPI client.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_source(config, Arc::new(NewsApiClient::new(config)))
    }

    /// Same wiring with an injected news source; tests substitute doubles here.
    pub fn with_source(config: &AppConfig, source: Arc<dyn NewsSource>) -> Self {
        let cache = Arc::new(ResponseCache::new(config.cache_ttl, config.refresh_threshold));
        let history = Arc::new(HistoryLog::with_capacity(config.history_limit));
        let pipeline = Arc::new(NewsPipeline::new(cache, history.clone(), source));
        Self { pipeline, history }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/news", post(get_news))
        .route("/history", get(get_history))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_news(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match state.pipeline.handle(&body).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(NewsError::Invalid(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": errors })),
        )
            .into_response(),
        Err(NewsError::Fetch(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch news data", "details": e.to_string() })),
        )
            .into_response(),
    }
}

async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryRecord>> {
    Json(state.history.snapshot())
}
