//! Analytics instrumentation.
//!
//! The site is a pure caller of a hosted analytics service: it emits
//! page, identify, and track events and owns nothing about delivery,
//! batching, or retry. [`AnalyticsSink`] is the seam to that service;
//! the production implementation is [`SegmentClient`].

pub mod segment;
pub mod tracker;

pub use segment::{SegmentClient, SegmentError};
pub use tracker::{PageViewTracker, page_name};

use topspin_core::VisitorId;
use uuid::Uuid;

/// Per-session identity attached to every analytics call.
///
/// The anonymous id is minted once per session so page views emitted
/// before any form submission can still be stitched to the identity
/// established later.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Session-scoped anonymous id.
    pub anonymous_id: Uuid,
    /// Derived pseudo user id, once a form has claimed identity.
    pub user_id: Option<VisitorId>,
}

impl EventContext {
    /// Return a copy of this context with the user id set.
    #[must_use]
    pub fn with_user(&self, user_id: VisitorId) -> Self {
        Self {
            anonymous_id: self.anonymous_id,
            user_id: Some(user_id),
        }
    }
}

/// Destination for analytics events.
///
/// Calls are fire-and-forget: implementations must not block the caller
/// on delivery, and delivery failures are theirs to log and drop.
pub trait AnalyticsSink: Send + Sync {
    /// Record that a named page was displayed.
    fn page(&self, ctx: &EventContext, name: &str);

    /// Associate the context's user id with a set of traits.
    fn identify(&self, ctx: &EventContext, traits: serde_json::Value);

    /// Record a named occurrence with associated properties.
    fn track(&self, ctx: &EventContext, event: &str, properties: serde_json::Value);
}
