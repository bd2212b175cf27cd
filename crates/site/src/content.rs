//! Content management for markdown-based article pages.
//!
//! Loads markdown files from the `content/articles/` directory at
//! startup, parses YAML frontmatter metadata, and renders markdown to
//! HTML. Articles are static: the store is immutable after load.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Metadata for an article, from its frontmatter.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered article with metadata and HTML content.
#[derive(Debug, Clone)]
pub struct Article {
    pub slug: String,
    pub meta: ArticleMeta,
    pub content_html: String,
}

/// Content loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Article store holding all loaded content in memory.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    articles: Arc<HashMap<String, Article>>,
}

impl ArticleStore {
    /// Load all articles from `<content_dir>/articles`.
    ///
    /// # Errors
    ///
    /// Returns an error if the articles directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("articles");
        let mut articles = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Articles directory does not exist: {:?}", dir);
            return Ok(Self {
                articles: Arc::new(articles),
            });
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_article(&path) {
                    Ok(article) => {
                        tracing::info!("Loaded article: {}", article.slug);
                        articles.insert(article.slug.clone(), article);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load article {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self {
            articles: Arc::new(articles),
        })
    }

    /// Load a single article from a markdown file.
    fn load_article(path: &Path) -> Result<Article, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<ArticleMeta> = matter
            .parse(&content)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        let content_html = render_markdown(&parsed.content);

        Ok(Article {
            slug,
            meta,
            content_html,
        })
    }

    /// Get an article by slug.
    #[must_use]
    pub fn get_article(&self, slug: &str) -> Option<&Article> {
        self.articles.get(slug)
    }

    /// Number of loaded articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether no articles were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Render markdown to HTML with GitHub Flavored Markdown extensions.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    markdown_to_html(content, &options)
}
