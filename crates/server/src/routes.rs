use std::sync::Arc;

use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use service::posts::PostStorage;

pub mod posts;

/// Shared handler state: the post storage, whichever backend it is.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn PostStorage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn PostStorage>) -> Self {
        Self { storage }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/v1/posts", axum::routing::post(posts::create_post))
        .route("/api/v1/posts/:post_id", get(posts::get_post).patch(posts::patch_post))
        .route("/api/v1/users/:user_id/posts", get(posts::list_user_posts));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
