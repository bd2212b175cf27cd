//! Page-view de-duplication.
//!
//! A page-view event must fire exactly once per *change* of location:
//! never on a re-render of an unchanged location, and never twice in a
//! row for the same path. The tracker keeps the last-recorded path in an
//! explicit memo cell; the middleware persists that cell in the
//! visitor's session between requests.

/// Resolve a request path to the page name reported to analytics.
///
/// A closed mapping with an explicit default: the four known routes get
/// their display names, anything else is "Unknown Page".
#[must_use]
pub fn page_name(path: &str) -> &'static str {
    match path {
        "/" => "Home Page",
        "/article-serve" => "Serve Tips Page",
        "/article-footwork" => "Footwork Tips Page",
        "/article-racket" => "Racket Guide Page",
        _ => "Unknown Page",
    }
}

/// Tracks the last location a page-view event was recorded for.
#[derive(Debug, Default)]
pub struct PageViewTracker {
    last_path: Option<String>,
}

impl PageViewTracker {
    /// Create a tracker with no location recorded yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_path: None }
    }

    /// Resume a tracker from a previously persisted memo.
    #[must_use]
    pub const fn resume(last_path: Option<String>) -> Self {
        Self { last_path }
    }

    /// Observe a navigation to `path`.
    ///
    /// Returns the page name to report when the location changed
    /// (including the very first observation), or `None` when the
    /// location is unchanged.
    pub fn observe(&mut self, path: &str) -> Option<&'static str> {
        if self.last_path.as_deref() == Some(path) {
            return None;
        }

        self.last_path = Some(path.to_owned());
        Some(page_name(path))
    }

    /// The last path a page view was recorded for.
    #[must_use]
    pub fn last_path(&self) -> Option<&str> {
        self.last_path.as_deref()
    }
}
