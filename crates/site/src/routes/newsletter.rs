//! Newsletter signup route handlers.
//!
//! Handles the home page newsletter form: derives the visitor's pseudo
//! user id from their email, claims the session identity with it, and
//! emits the identify + track pair to analytics.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse, response::Response};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use topspin_core::{Email, VisitorId};

use crate::error::Result;
use crate::models::session::{claim_identity, event_context};
use crate::state::AppState;

/// Newsletter signup form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Success fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_success.html")]
pub struct SubscribeSuccessTemplate {
    pub first_name: String,
}

/// Error fragment template (re-renders the form with a message).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_error.html")]
pub struct SubscribeErrorTemplate {
    pub message: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Subscribe to the newsletter (HTMX).
///
/// All three fields are required; the templates mark them `required`,
/// and blank values are rejected here as well so the analytics steps
/// only ever run with a complete submission.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SubscribeForm>,
) -> Result<Response> {
    let first_name = form.first_name.trim().to_owned();
    let last_name = form.last_name.trim().to_owned();
    let email_input = form.email.trim().to_lowercase();

    let error = |message: &str| {
        SubscribeErrorTemplate {
            message: message.to_owned(),
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email: email_input.clone(),
        }
        .into_response()
    };

    if first_name.is_empty() || last_name.is_empty() {
        return Ok(error("First and last name are required."));
    }

    let Ok(email) = Email::parse(&email_input) else {
        return Ok(error("Please enter a valid email address."));
    };

    // Email is non-blank here, so an identity can always be derived.
    let Some(uid) = VisitorId::derive(email.as_str()) else {
        return Ok(error("Please enter a valid email address."));
    };

    // The newsletter form always claims identity, replacing any
    // previously derived id.
    claim_identity(&session, &uid).await?;

    let ctx = event_context(&session).await?;
    state.analytics().identify(
        &ctx,
        json!({
            "email": email.as_str(),
            "firstName": &first_name,
            "lastName": &last_name,
        }),
    );
    state
        .analytics()
        .track(&ctx, "Newsletter Signup", json!({ "email": email.as_str() }));

    tracing::info!(email = %email, visitor_id = %uid, "Newsletter signup");

    Ok(SubscribeSuccessTemplate { first_name }.into_response())
}
