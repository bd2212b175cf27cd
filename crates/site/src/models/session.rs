//! Session-stored state.
//!
//! The session is the only cross-view state in the system: the derived
//! visitor id (first-writer-wins across the two forms), the anonymous id
//! every analytics call carries, and the page-view tracker's memo.

use tower_sessions::Session;
use uuid::Uuid;

use topspin_core::VisitorId;

use crate::analytics::EventContext;

/// Session keys.
pub mod keys {
    /// Key for the derived pseudo user id.
    pub const VISITOR_ID: &str = "visitor_id";

    /// Key for the session-scoped anonymous analytics id.
    pub const ANONYMOUS_ID: &str = "anonymous_id";

    /// Key for the last path a page view was recorded for.
    pub const LAST_PAGE_PATH: &str = "last_page_path";
}

/// Build the analytics [`EventContext`] for this session.
///
/// Mints the anonymous id on first use and reuses it for the rest of
/// the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn event_context(session: &Session) -> Result<EventContext, tower_sessions::session::Error> {
    let user_id: Option<VisitorId> = session.get(keys::VISITOR_ID).await?;

    let anonymous_id: Uuid = match session.get(keys::ANONYMOUS_ID).await? {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            session.insert(keys::ANONYMOUS_ID, id).await?;
            id
        }
    };

    Ok(EventContext {
        anonymous_id,
        user_id,
    })
}

/// Store the visitor id, unconditionally replacing any existing one.
///
/// The newsletter form always claims identity.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn claim_identity(
    session: &Session,
    id: &VisitorId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::VISITOR_ID, id).await
}

/// Return the session's visitor id, or establish `fallback` if none is
/// set yet.
///
/// First-writer-wins: an id already claimed by an earlier form
/// submission is never overwritten.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn identity_or_claim(
    session: &Session,
    fallback: VisitorId,
) -> Result<VisitorId, tower_sessions::session::Error> {
    if let Some(existing) = session.get::<VisitorId>(keys::VISITOR_ID).await? {
        return Ok(existing);
    }

    session.insert(keys::VISITOR_ID, &fallback).await?;
    Ok(fallback)
}
