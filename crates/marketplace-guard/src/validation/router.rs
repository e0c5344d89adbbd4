use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::Record;
use super::sanitizer::SanitizeOptions;
use super::ValidationEngine;

/// Router builder exposing the engine over HTTP.
pub fn validation_router(engine: Arc<ValidationEngine>) -> Router {
    Router::new()
        .route("/api/v1/validate/:entity", post(validate_handler))
        .route("/api/v1/sanitize", post(sanitize_handler))
        .route("/api/v1/password/strength", post(password_handler))
        .with_state(engine)
}

pub(crate) async fn validate_handler(
    State(engine): State<Arc<ValidationEngine>>,
    Path(entity): Path<String>,
    Json(record): Json<Record>,
) -> Response {
    let result = engine.validate_form(&record, &entity);
    let status = if result.is_valid() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(result)).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SanitizeRequest {
    value: String,
    #[serde(default)]
    max_length: Option<usize>,
    #[serde(default)]
    allow_html: bool,
}

pub(crate) async fn sanitize_handler(
    State(engine): State<Arc<ValidationEngine>>,
    Json(request): Json<SanitizeRequest>,
) -> Response {
    let options = SanitizeOptions {
        max_length: request
            .max_length
            .unwrap_or(engine.rules().default_max_length),
        allow_html: request.allow_html,
    };
    let payload = json!({
        "sanitized": engine.sanitize(&request.value, options),
        "threats": engine.detect_threats(&request.value),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct PasswordRequest {
    password: String,
}

pub(crate) async fn password_handler(
    State(engine): State<Arc<ValidationEngine>>,
    Json(request): Json<PasswordRequest>,
) -> Response {
    let strength = engine.assess_password(&request.password);
    let payload = json!({
        "score": strength.score,
        "acceptable": strength.is_acceptable(),
        "unmet": strength.unmet,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
