//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_approve_group_user_handler, get_approve_group_user_handler, info_handler,
    put_approve_group_user_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /quick/test/info` - Liveness probe
/// - `GET /cache/stats` - Cache statistics
/// - `GET|PUT|DELETE /workflow/approve-group-users/:id` - Cached member lookup and updates
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/quick/test/info", get(info_handler))
        .route("/cache/stats", get(stats_handler))
        .route(
            "/workflow/approve-group-users/:id",
            put(put_approve_group_user_handler)
                .get(get_approve_group_user_handler)
                .delete(delete_approve_group_user_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
