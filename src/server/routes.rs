//! Route table and handlers for the query service.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::answerer::{SearchAnswerer, ServiceError};

/// Body of every failed search response.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

/// Response header carrying the coarse error kind of a failed search.
pub const ERROR_KIND_HEADER: &str = "x-error-kind";

#[derive(Clone)]
struct AppState {
    answerer: Arc<SearchAnswerer>,
}

/// Request body of `POST /api/search`. A missing query is the empty string.
#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: String,
}

/// Builds the service router.
pub fn router(answerer: Arc<SearchAnswerer>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/search", post(search))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { answerer })
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "running" })))
}

// The body is taken raw so that malformed JSON goes through the same
// generic-500 path as provider failures instead of axum's 4xx rejections.
async fn search(State(state): State<AppState>, body: Bytes) -> Result<Response, ServiceError> {
    let request: SearchRequest =
        serde_json::from_slice(&body).map_err(ServiceError::MalformedRequest)?;

    info!(query_len = request.query.len(), "search request");
    let answer = state.answerer.answer(&request.query).await?;
    info!(sources = answer.sources().len(), "search answered");

    Ok((StatusCode::OK, Json(answer)).into_response())
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        error!(kind = %kind, stage = self.stage(), error = %self, "search request failed");

        let mut response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": GENERIC_ERROR_MESSAGE })),
        )
            .into_response();
        response.headers_mut().insert(
            HeaderName::from_static(ERROR_KIND_HEADER),
            HeaderValue::from_static(kind.as_str()),
        );
        response
    }
}
