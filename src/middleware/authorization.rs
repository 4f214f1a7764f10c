//! Bearer-token authorization middleware.
//!
//! Two entry points, mirroring the two ways routes get guarded:
//! - `apply` puts the guard in front of every route of a Router; only
//!   globally granted roles can satisfy the policy there
//! - `require_role` wraps a set of routes with route-specific required roles
//!
//! On success the resolved `UserInfo` lands in request extensions so
//! handlers can see the caller's identity. A bypassed check (guard
//! disabled, CORS pre-flight) leaves no identity behind.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Role;
use crate::state::AppState;

/// Guard every route of `router`.
///
/// 例：
/// ```ignore
/// let app = api::v1::routes(state.clone());
/// let app = middleware::authorization::apply(app, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、from_fn_with_state で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, authorize_any))
}

async fn authorize_any(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(state, req, next, &[]).await
}

/// Guard the routes of `router` with route-specific required roles.
///
/// `route_layer` is used so the check only runs for requests that actually
/// match one of the wrapped routes.
pub fn require_role(router: Router<AppState>, state: AppState, roles: &[Role]) -> Router<AppState> {
    let required: Vec<Role> = roles.to_vec();

    router.route_layer(middleware::from_fn_with_state(
        state,
        move |State(state): State<AppState>, req: Request<Body>, next: Next| {
            let required = required.clone();
            async move { authorize(state, req, next, &required).await }
        },
    ))
}

async fn authorize(
    state: AppState,
    mut req: Request<Body>,
    next: Next,
    required: &[Role],
) -> Result<Response, AppError> {
    let user = state
        .guard
        .verify_permission(req.method(), req.headers(), required)
        .await?;

    // middleware → handler への受け渡し
    if let Some(user) = user {
        req.extensions_mut().insert(user);
    }

    Ok(next.run(req).await)
}
