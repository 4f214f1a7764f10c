/*
 * Responsibility
 * - GET /me : 認可済み呼び出し元の identity を返す
 * - middleware が extensions に入れた UserInfo をそのまま echo する
 */
use axum::{Extension, Json, response::IntoResponse};
use serde_json::json;

use crate::services::auth::UserInfo;

pub async fn me(user: Option<Extension<UserInfo>>) -> impl IntoResponse {
    match user {
        Some(Extension(user)) => Json(json!({
            "username": user.username,
            "email_verified": user.email_verified,
            "roles": user.roles,
        })),
        // Guard disabled (local/test) leaves no identity behind.
        None => Json(json!({
            "username": null,
            "email_verified": false,
            "roles": [],
        })),
    }
}
