//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{download, health, index, mix};
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/mix", post(mix::mix_endpoint));

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health))
        .route("/download/:name", get(download::download))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer())
        .with_state(state)
}
