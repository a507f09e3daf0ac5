/*
 * Responsibility
 * - GET /health (liveness)
 * - Not exempt: passes the auth stage anonymously
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
