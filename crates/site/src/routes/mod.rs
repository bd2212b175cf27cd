//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                     - Home page (nav, newsletter + purchase forms)
//! GET  /article-serve        - Serve Tips article
//! GET  /article-footwork     - Footwork Tips article
//! GET  /article-racket       - Racket Guide article
//! GET  /health               - Health check
//!
//! # Forms (HTMX fragments)
//! POST /newsletter/subscribe - Newsletter signup
//! POST /purchase             - Coaching package purchase
//! ```
//!
//! Any other path falls through to the 404 page.

pub mod articles;
pub mod home;
pub mod newsletter;
pub mod purchase;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::filters;
use crate::state::AppState;

/// Create the page routes router.
///
/// These are the routes the page-view tracking middleware wraps.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/article-serve", get(articles::serve))
        .route("/article-footwork", get(articles::footwork))
        .route("/article-racket", get(articles::racket))
}

/// Create the form submission routes router.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter/subscribe", post(newsletter::subscribe))
        .route("/purchase", post(purchase::purchase))
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate;

/// Fallback handler for unrouted paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}
