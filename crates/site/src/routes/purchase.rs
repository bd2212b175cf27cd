//! Coaching package purchase route handlers.
//!
//! The purchase form reuses an identity already established by a
//! newsletter signup in the same session; only when none exists does it
//! derive one from its own email. First-writer-wins.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse, response::Response};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use topspin_core::{CoachingPackage, Email, VisitorId};

use crate::error::Result;
use crate::models::session::{event_context, identity_or_claim};
use crate::state::AppState;

/// Purchase form data.
///
/// The package deserializes straight into the closed enum: a missing,
/// placeholder, or unknown selection never reaches the handler.
#[derive(Debug, Deserialize)]
pub struct PurchaseForm {
    pub email: String,
    pub package: CoachingPackage,
}

/// Success fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "purchase/purchase_success.html")]
pub struct PurchaseSuccessTemplate {
    pub package_name: &'static str,
}

/// Error fragment template (re-renders the form with a message).
#[derive(Template, WebTemplate)]
#[template(path = "purchase/purchase_error.html")]
pub struct PurchaseErrorTemplate {
    pub message: String,
    pub email: String,
    pub packages: [CoachingPackage; 3],
}

/// Purchase a coaching package (HTMX).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, form), fields(email = %form.email, package = %form.package))]
pub async fn purchase(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PurchaseForm>,
) -> Result<Response> {
    let email_input = form.email.trim().to_lowercase();

    let error = |message: &str| {
        PurchaseErrorTemplate {
            message: message.to_owned(),
            email: email_input.clone(),
            packages: CoachingPackage::ALL,
        }
        .into_response()
    };

    let Ok(email) = Email::parse(&email_input) else {
        return Ok(error("Please enter a valid email address."));
    };

    let Some(derived) = VisitorId::derive(email.as_str()) else {
        return Ok(error("Please enter a valid email address."));
    };

    // Reuse the id established earlier in the session, if any; the
    // derived one only sticks when the session had no identity yet.
    let uid = identity_or_claim(&session, derived).await?;

    let ctx = event_context(&session).await?;
    state
        .analytics()
        .identify(&ctx, json!({ "email": email.as_str() }));
    state.analytics().track(
        &ctx,
        "Coaching Package Purchased",
        json!({
            "package": form.package.name(),
            "email": email.as_str(),
        }),
    );

    tracing::info!(email = %email, package = %form.package, visitor_id = %uid, "Package purchased");

    Ok(PurchaseSuccessTemplate {
        package_name: form.package.name(),
    }
    .into_response())
}
