//! Application state shared across handlers.

use std::sync::Arc;

use crate::analytics::AnalyticsSink;
use crate::config::SiteConfig;
use crate::content::ArticleStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the article content store, and the
/// analytics sink.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    articles: ArticleStore,
    analytics: Arc<dyn AnalyticsSink>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: SiteConfig,
        articles: ArticleStore,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                articles,
                analytics,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the article content store.
    #[must_use]
    pub fn content(&self) -> &ArticleStore {
        &self.inner.articles
    }

    /// Get a reference to the analytics sink.
    #[must_use]
    pub fn analytics(&self) -> &dyn AnalyticsSink {
        self.inner.analytics.as_ref()
    }
}
