/*
 * Responsibility
 * - GET /admin/status (admin ロール限定の疎通用)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn admin_status() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
