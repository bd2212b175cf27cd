//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use topspin_core::CoachingPackage;

use crate::filters;
use crate::routes::articles::{self, ArticleInfo};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Article navigation cards.
    pub articles: [ArticleInfo; 3],
    /// Package options for the purchase form select.
    pub packages: [CoachingPackage; 3],
}

/// Display the home page.
#[instrument]
pub async fn home() -> HomeTemplate {
    HomeTemplate {
        articles: articles::ALL,
        packages: CoachingPackage::ALL,
    }
}
