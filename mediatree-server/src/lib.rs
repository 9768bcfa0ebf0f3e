//! # Mediatree Server
//!
//! axum service exposing a single media root: directory listings, whole-tree
//! search, video metadata, byte-range streaming and the playlist/favorite
//! collections. Every path parameter goes through the core resolver, so
//! `AccessDenied` and `NotFound` surface as 403 and 404 without revealing
//! where the root lives.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use mediatree_core::api::routes::{HEALTH, PING};

/// Builds the full application router with middleware applied.
pub fn create_app(state: AppState) -> Router {
    let cors = infra::startup::cors_layer(state.config());

    Router::new()
        .route(PING, get(handlers::health::ping_handler))
        .route(HEALTH, get(handlers::health::health_handler))
        .merge(routes::create_api_router())
        // CORS outermost, then tracing
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
