use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use fortune_core::domain::batch::BatchCount;
use fortune_core::domain::fortune::{BatchResponse, FortuneRecord};
use fortune_core::service::FortuneService;

const WEB_PAGE: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub fortunes: Arc<FortuneService>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/fortune", get(get_fortune))
        .route("/fortune/batch", get(get_batch))
        .route("/fortune/lucky-numbers", get(get_lucky_numbers))
        .route("/web", get(web))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "🔮 Welcome to the Mystical Fortune API! 🔮",
        "endpoints": {
            "/fortune": "GET - Receive your magical destiny",
            "/fortune/batch": "GET - Receive multiple fortunes (use ?count=N parameter, 1-10)",
            "/fortune/lucky-numbers": "GET - Receive a fortune with lucky numbers and a lucky color",
            "/web": "GET - Consult the oracle in your browser",
        },
        "example": "Try: GET /fortune",
    }))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_fortune(State(state): State<AppState>) -> Json<FortuneRecord> {
    Json(state.fortunes.generate_fortune().await)
}

async fn get_batch(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<BatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    // First occurrence wins when `count` is repeated.
    let raw_count = params
        .iter()
        .find(|(key, _)| key == "count")
        .map(|(_, value)| value.as_str());

    let count = BatchCount::from_query(raw_count).map_err(|e| {
        tracing::info!(count = ?raw_count, error = %e, "rejected batch request");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let fortunes = state.fortunes.batch(count).await;
    Ok(Json(BatchResponse::from(fortunes)))
}

async fn get_lucky_numbers(State(state): State<AppState>) -> Json<FortuneRecord> {
    Json(state.fortunes.lucky_numbers().await)
}

async fn web() -> Html<&'static str> {
    Html(WEB_PAGE)
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}
