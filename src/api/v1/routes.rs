/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - Bearer が必要な範囲を require_role で適用する
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{me::me, status::admin_status};
use crate::middleware::authorization;
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let me_routes = authorization::require_role(
        Router::new().route("/me", get(me)),
        state.clone(),
        &[Role::Viewer, Role::Editor, Role::Admin],
    );

    let admin_routes = authorization::require_role(
        Router::new().route("/admin/status", get(admin_status)),
        state,
        &[Role::Admin],
    );

    me_routes.merge(admin_routes)
}
