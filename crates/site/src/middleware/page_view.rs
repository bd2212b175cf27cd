//! Page-view tracking middleware.
//!
//! Layered over the page routes only. Emits a page event when the
//! session's location changed, after the inner handler has produced a
//! successful response - so a click-initiated track (e.g. "Article
//! Read") precedes the page-view call, and failed requests record
//! nothing.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::analytics::PageViewTracker;
use crate::models::session::{event_context, keys};
use crate::state::AppState;

/// Record a page view once per location change.
pub async fn track_page_views(
    State(state): State<AppState>,
    session: Session,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    if response.status().is_success() {
        if let Err(e) = observe(&state, &session, &path).await {
            tracing::warn!(path, error = %e, "Failed to record page view");
        }
    }

    response
}

/// Run the tracker against the session's memo and emit when it fires.
async fn observe(
    state: &AppState,
    session: &Session,
    path: &str,
) -> Result<(), tower_sessions::session::Error> {
    let last_path: Option<String> = session.get(keys::LAST_PAGE_PATH).await?;

    let mut tracker = PageViewTracker::resume(last_path);
    if let Some(name) = tracker.observe(path) {
        let ctx = event_context(session).await?;
        tracing::debug!(page = name, "Tracking page view");
        state.analytics().page(&ctx, name);
        session.insert(keys::LAST_PAGE_PATH, path).await?;
    }

    Ok(())
}
