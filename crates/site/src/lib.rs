//! Topspin Coaching marketing site library.
//!
//! This crate provides the site functionality as a library, allowing it
//! to be tested and reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod analytics;
pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the full application router.
///
/// The page routes are wrapped in the page-view tracking middleware; the
/// session layer sits outside everything so both the tracker and the
/// form handlers see the same session.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer();

    let pages = routes::page_routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::track_page_views,
    ));

    Router::new()
        .route("/health", get(health))
        .merge(pages)
        .merge(routes::form_routes())
        .fallback(routes::not_found)
        .nest_service("/static", ServeDir::new("crates/site/static"))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
