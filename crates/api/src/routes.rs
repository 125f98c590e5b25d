use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// Every path other than `/health` goes through the DoH fallback, which
/// applies the configured path prefix itself.
pub fn create_doh_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .fallback(handlers::handle_doh)
        .with_state(state)
}
