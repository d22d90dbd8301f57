/// NewsData.io provider
///
/// API Flow:
/// 1. Search: /news?q=... → articles matching the query
/// 2. Listing: /latest → most recent articles, filtered by category/country
///
/// Both return `{"status": "success", "totalResults": N, "results": [...], "nextPage": "..."}`.
/// Passing `nextPage` back as `page` fetches the following page.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::NewsDataConfig,
    error::{AppError, AppResult},
    models::{ArticlePage, ArticleRecord, NewsDataResponse},
    services::providers::{Endpoint, NewsProvider, NewsQuery},
};

#[derive(Clone)]
pub struct NewsDataProvider {
    http_client: HttpClient,
    config: NewsDataConfig,
}

impl NewsDataProvider {
    pub fn new(config: NewsDataConfig) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::Search => "news",
            Endpoint::Latest => "latest",
        };
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Query-string parameters for a lookup, credential first
    fn query_params(&self, request: &NewsQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", self.config.api_key.clone()),
            ("language", self.config.language.clone()),
            ("size", request.max_results.to_string()),
        ];
        if let Some(q) = &request.query {
            params.push(("q", q.clone()));
        }
        if let Some(category) = &request.category {
            params.push(("category", category.clone()));
        }
        if let Some(country) = &request.country {
            params.push(("country", country.clone()));
        }
        if let Some(page) = &request.page {
            params.push(("page", page.clone()));
        }
        params
    }

    /// Decodes the `results` array, skipping entries that are not article objects
    fn parse_results(&self, body: NewsDataResponse) -> AppResult<ArticlePage> {
        if body.status != "success" {
            return Err(AppError::ExternalApi(format!(
                "NewsData returned status '{}'",
                body.status
            )));
        }

        let total = body.results.len();
        let articles: Vec<ArticleRecord> = body
            .results
            .into_iter()
            .filter_map(|result| serde_json::from_value::<ArticleRecord>(result).ok())
            .collect();

        if articles.len() < total {
            tracing::debug!(
                skipped = total - articles.len(),
                provider = "newsdata",
                "Skipped undecodable NewsData results"
            );
        }

        Ok(ArticlePage {
            articles,
            next_page: body.next_page,
            total_results: body.total_results,
        })
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsDataProvider {
    #[tracing::instrument(
        skip(self, request),
        fields(provider = "newsdata", endpoint = ?request.endpoint, paged = request.page.is_some())
    )]
    async fn fetch(&self, request: &NewsQuery) -> AppResult<ArticlePage> {
        let url = self.endpoint_url(request.endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(&self.query_params(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "NewsData API returned status {}: {}",
                status, body
            )));
        }

        let body: NewsDataResponse = response.json().await?;
        let page = self.parse_results(body)?;

        tracing::info!(
            query = request.query.as_deref().unwrap_or(""),
            results = page.articles.len(),
            has_next_page = page.next_page.is_some(),
            "News fetch completed"
        );

        Ok(page)
    }

    fn name(&self) -> &'static str {
        "newsdata"
    }
}
