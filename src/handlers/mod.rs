pub mod analyze;
pub mod health;
pub mod page;

pub use analyze::*;
pub use health::*;
pub use page::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::logging_middleware;
use crate::state::AppState;

// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application router with all routes and layers.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_file_size_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(index_handler).post(submit_page_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/ats", post(analyze_handler))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
