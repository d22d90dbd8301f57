use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Fields a provider article may expose to clients
pub const ALLOWED_FIELDS: &[&str] = &[
    "article_id",
    "title",
    "description",
    "link",
    "image_url",
    "pubDate",
    "source_id",
    "source_name",
    "source_url",
    "category",
    "country",
    "language",
];

/// Article as returned by the news provider
///
/// Only `title`, `description` and `link` are interpreted. Everything else
/// (source, dates, category, image) is carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Title and description joined by a space, description omitted when absent
    pub fn full_text(&self) -> String {
        let title = self.title.as_deref().unwrap_or_default();
        match self.description.as_deref() {
            Some(description) => format!("{} {}", title, description),
            None => title.to_string(),
        }
    }

    /// Restricts the record to [`ALLOWED_FIELDS`] that are present
    pub fn project(&self) -> Recommendation {
        let mut fields = Map::new();
        if let Some(title) = &self.title {
            fields.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            fields.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(link) = &self.link {
            fields.insert("link".to_string(), Value::String(link.clone()));
        }
        for (key, value) in &self.metadata {
            if ALLOWED_FIELDS.contains(&key.as_str()) {
                fields.insert(key.clone(), value.clone());
            }
        }
        Recommendation(fields)
    }
}

/// The article the user clicked, as posted by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickedArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Links the user has already seen; never recommended again
    #[serde(default)]
    pub clicked_urls: HashSet<String>,
}

impl ClickedArticle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_clicked_url(mut self, url: impl Into<String>) -> Self {
        self.clicked_urls.insert(url.into());
        self
    }

    /// Trimmed title, `None` when missing or blank
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }

    /// Title and description joined by a space
    pub fn full_text(&self) -> String {
        let title = self.trimmed_title().unwrap_or_default();
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => format!("{} {}", title, description),
            _ => title.to_string(),
        }
    }
}

/// Client-facing projection of an [`ArticleRecord`]
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Recommendation(Map<String, Value>);

impl Recommendation {
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn link(&self) -> Option<&str> {
        self.0.get("link").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// One page of provider results with the cursor for the next one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticlePage {
    pub articles: Vec<ArticleRecord>,
    pub next_page: Option<String>,
    pub total_results: Option<u64>,
}

/// Response body for every article-listing endpoint
///
/// Paging fields are only present on browse listings that have them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    pub articles: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

impl ArticlesResponse {
    pub fn new(articles: Vec<Recommendation>) -> Self {
        Self {
            articles,
            next_page: None,
            total_results: None,
        }
    }
}

impl From<ArticlePage> for ArticlesResponse {
    fn from(page: ArticlePage) -> Self {
        Self {
            articles: page.articles.iter().map(ArticleRecord::project).collect(),
            next_page: page.next_page,
            total_results: page.total_results,
        }
    }
}

// ============================================================================
// NewsData.io API Types
// ============================================================================

/// Envelope of NewsData.io `/news` and `/latest` responses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDataResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_page: Option<String>,
}
