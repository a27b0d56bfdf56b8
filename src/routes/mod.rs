use axum::Router;

use crate::state::AppState;

pub mod admin_route;
pub mod auth_route;
pub mod organization_route;
pub mod question_route;

#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_route::auth_router(state.clone()))
        .nest(
            "/organizations",
            organization_route::organization_router(state.clone()),
        )
        .merge(question_route::question_router(state.clone()))
        .nest("/admin", admin_route::admin_router(state.clone()))
        .with_state(state)
}
