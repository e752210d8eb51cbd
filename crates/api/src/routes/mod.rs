pub mod health;
pub mod sites;

use axum::Router;

use crate::middleware;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(sites::routes())
        .with_state(state)
}

/// Router with the production middleware stack.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer())
        .layer(middleware::body_limit::body_limit_layer())
}
