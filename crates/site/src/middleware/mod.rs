//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Page-view tracking (page routes only)

pub mod page_view;
pub mod session;

pub use page_view::track_page_views;
pub use session::create_session_layer;
