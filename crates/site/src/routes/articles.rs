//! Article page route handlers.
//!
//! Each article visit fires a "Article Read" track event - the
//! server-side moment of the navigation link being activated - in
//! addition to (and before) the page-view event emitted by the tracking
//! middleware once the route settles. The two events are deliberately
//! distinct: re-rendering an unchanged location suppresses the page
//! view but not the read event.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::NaiveDate;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session::event_context;
use crate::state::AppState;

/// Static description of one article page.
#[derive(Debug, Clone, Copy)]
pub struct ArticleInfo {
    /// Content store slug.
    pub slug: &'static str,
    /// Route path.
    pub path: &'static str,
    /// Display name used in navigation and the "Article Read" event.
    pub title: &'static str,
}

/// Serve technique article.
pub const SERVE: ArticleInfo = ArticleInfo {
    slug: "serve",
    path: "/article-serve",
    title: "Serve Tips",
};

/// Footwork article.
pub const FOOTWORK: ArticleInfo = ArticleInfo {
    slug: "footwork",
    path: "/article-footwork",
    title: "Footwork Tips",
};

/// Racket guide article.
pub const RACKET: ArticleInfo = ArticleInfo {
    slug: "racket",
    path: "/article-racket",
    title: "Racket Guide",
};

/// All articles, in navigation order.
pub const ALL: [ArticleInfo; 3] = [SERVE, FOOTWORK, RACKET];

/// Article page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/article.html")]
pub struct ArticleTemplate {
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Track the read event and render an article from the content store.
async fn show_article(
    state: &AppState,
    session: &Session,
    info: ArticleInfo,
) -> Result<ArticleTemplate> {
    let ctx = event_context(session).await?;
    state
        .analytics()
        .track(&ctx, "Article Read", json!({ "article": info.title }));

    let article = state
        .content()
        .get_article(info.slug)
        .ok_or_else(|| AppError::NotFound(info.slug.to_string()))?;

    Ok(ArticleTemplate {
        title: article.meta.title.clone(),
        description: article.meta.description.clone().unwrap_or_default(),
        updated_at: article.meta.updated_at,
        content_html: article.content_html.clone(),
    })
}

/// Display the Serve Tips article.
///
/// # Errors
///
/// Returns 404 if the article content is missing.
#[instrument(skip(state, session))]
pub async fn serve(State(state): State<AppState>, session: Session) -> Result<ArticleTemplate> {
    show_article(&state, &session, SERVE).await
}

/// Display the Footwork Tips article.
///
/// # Errors
///
/// Returns 404 if the article content is missing.
#[instrument(skip(state, session))]
pub async fn footwork(State(state): State<AppState>, session: Session) -> Result<ArticleTemplate> {
    show_article(&state, &session, FOOTWORK).await
}

/// Display the Racket Guide article.
///
/// # Errors
///
/// Returns 404 if the article content is missing.
#[instrument(skip(state, session))]
pub async fn racket(State(state): State<AppState>, session: Session) -> Result<ArticleTemplate> {
    show_article(&state, &session, RACKET).await
}
