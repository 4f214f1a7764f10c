/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::AuthorizationGuard;

#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<AuthorizationGuard>,
}

impl AppState {
    pub fn new(guard: Arc<AuthorizationGuard>) -> Self {
        Self { guard }
    }
}
