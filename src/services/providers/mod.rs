/// News data provider abstraction
///
/// The recommendation pipeline only needs "give me up to N articles for this
/// query". Providers implement a single fallible `fetch`; the public lookups
/// are built on top of it and absorb every upstream failure as an empty list,
/// so an outage degrades to "no candidates" instead of an error.
use crate::{
    error::AppResult,
    models::{ArticlePage, ArticleRecord},
};

pub mod newsdata;

/// Which provider listing to hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Full-text search over recent articles
    Search,
    /// Most recent articles, optionally filtered
    Latest,
}

/// A single provider lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub endpoint: Endpoint,
    pub query: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub max_results: usize,
    /// Opaque cursor from a previous page's `next_page`
    pub page: Option<String>,
}

impl NewsQuery {
    pub fn search(query: &str, max_results: usize) -> Self {
        Self {
            endpoint: Endpoint::Search,
            query: Some(query.to_string()),
            category: None,
            country: None,
            max_results,
            page: None,
        }
    }

    pub fn latest(max_results: usize) -> Self {
        Self {
            endpoint: Endpoint::Latest,
            query: None,
            category: None,
            country: None,
            max_results,
            page: None,
        }
    }
}

/// Trait for news data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Run one lookup against the provider
    ///
    /// Transport errors, non-success statuses and undecodable bodies are errors here.
    async fn fetch(&self, request: &NewsQuery) -> AppResult<ArticlePage>;

    /// Articles matching a free-text query
    async fn search(&self, query: &str, max_results: usize) -> Vec<ArticleRecord> {
        self.fetch_or_empty(NewsQuery::search(query, max_results))
            .await
            .articles
    }

    /// Latest articles, optionally narrowed by a query
    async fn latest(
        &self,
        query: Option<String>,
        page: Option<String>,
        max_results: usize,
    ) -> ArticlePage {
        let request = NewsQuery {
            query,
            page,
            ..NewsQuery::latest(max_results)
        };
        self.fetch_or_empty(request).await
    }

    /// Latest articles in a category, optionally from one country
    async fn by_category(
        &self,
        category: &str,
        country: Option<String>,
        page: Option<String>,
        max_results: usize,
    ) -> ArticlePage {
        let request = NewsQuery {
            category: Some(category.to_string()),
            country: country.map(|c| c.to_lowercase()),
            page,
            ..NewsQuery::latest(max_results)
        };
        self.fetch_or_empty(request).await
    }

    /// Articles from a country; searches when a query is given, else lists latest
    async fn by_country(
        &self,
        country: &str,
        query: Option<String>,
        page: Option<String>,
        max_results: usize,
    ) -> ArticlePage {
        let endpoint = if query.is_some() {
            Endpoint::Search
        } else {
            Endpoint::Latest
        };
        let request = NewsQuery {
            endpoint,
            query,
            category: None,
            country: Some(country.to_lowercase()),
            max_results,
            page,
        };
        self.fetch_or_empty(request).await
    }

    /// Runs `fetch`, logging and discarding any error
    async fn fetch_or_empty(&self, request: NewsQuery) -> ArticlePage {
        match self.fetch(&request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.name(),
                    endpoint = ?request.endpoint,
                    "News fetch failed, continuing with no articles"
                );
                ArticlePage::default()
            }
        }
    }

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
