use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::MovieCandidate;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
    pub movies: Vec<MovieCandidate>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Identify movies from a scene description
///
/// Body rejections are mapped to [`AppError::InvalidInput`] so malformed requests
/// still get the `{error, movies}` shape.
pub async fn identify_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<IdentifyRequest>, JsonRejection>,
) -> AppResult<Json<IdentifyResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let description = request
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Description is required".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        description_chars = description.chars().count(),
        "Identification request received"
    );
    tracing::debug!(request_id = %request_id, description = %description, "Scene description");

    let identifier = state.identifier()?;
    let movies = identifier.identify(&description).await?;

    tracing::info!(
        request_id = %request_id,
        movies = movies.len(),
        "Identification request completed"
    );

    Ok(Json(IdentifyResponse { movies }))
}
