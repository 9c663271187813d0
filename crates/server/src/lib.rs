//! Statewise Server library.
//!
//! This crate provides the server functionality as a library, allowing it
//! to be tested and reused: the integration-tests crate builds the same
//! router the binary serves.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router around the given state.
///
/// Everything except the Sentry layers (which the binary adds outermost)
/// lives here, so tests exercise the same middleware stack as production.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
