use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::docs::{OPENAPI_PATH, openapi_json};
use super::error::ApiError;
use crate::models::{ChartAnalysis, ChartRequest};

/// Chart endpoints, meant to be mounted at `/api/charts`.
///
/// - `POST /generate` - analyze the data and return the chart as `image/png`
/// - `POST /analyze` - return the analysis as JSON without rendering
/// - `GET /health` - liveness probe
pub fn chart_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_chart))
        .route("/analyze", post(analyze_data))
        .route("/health", get(health))
}

/// The whole application router with request tracing. The OpenAPI document is served at
/// `/api-docs/openapi.json`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/charts", chart_routes())
        .route(OPENAPI_PATH, get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn generate_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "[HTTP] Received chart generation request (title: {:?}, chart type: {:?})",
        request.title,
        request.chart_type
    );

    let png = state.pipeline.generate(&request).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

pub async fn analyze_data(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> Json<ChartAnalysis> {
    tracing::info!(
        "[HTTP] Received data analysis request (title: {:?}, chart type: {:?})",
        request.title,
        request.chart_type
    );

    let analysis = state.pipeline.analyze(&request).await;
    tracing::debug!(
        "[HTTP] Returning {} analysis (fallback: {})",
        analysis.chart_type,
        analysis.is_fallback()
    );
    Json(analysis)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}
