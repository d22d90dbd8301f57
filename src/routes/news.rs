use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{models::ArticlesResponse, routes::AppState};

const DEFAULT_CATEGORY: &str = "top";
const DEFAULT_COUNTRY: &str = "in";

/// Largest page size a client may request from a browse listing
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    q: Option<String>,
    size: Option<usize>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    category: Option<String>,
    country: Option<String>,
    size: Option<usize>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountryQuery {
    country: Option<String>,
    q: Option<String>,
    size: Option<usize>,
    page: Option<String>,
}

/// Blank query-string values count as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Requested page size, falling back to the configured default and capped
fn page_size(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

/// Handler for latest news
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LatestQuery>,
) -> Json<ArticlesResponse> {
    let size = page_size(params.size, state.settings.max_results);
    let page = state
        .news_provider
        .latest(non_blank(params.q), non_blank(params.page), size)
        .await;
    Json(page.into())
}

/// Handler for latest news in a category
pub async fn category(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryQuery>,
) -> Json<ArticlesResponse> {
    let category = non_blank(params.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let size = page_size(params.size, state.settings.max_results);
    let page = state
        .news_provider
        .by_category(
            &category,
            non_blank(params.country),
            non_blank(params.page),
            size,
        )
        .await;
    Json(page.into())
}

/// Handler for news from one country
pub async fn country(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountryQuery>,
) -> Json<ArticlesResponse> {
    let country = non_blank(params.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
    let size = page_size(params.size, state.settings.max_results);
    let page = state
        .news_provider
        .by_country(&country, non_blank(params.q), non_blank(params.page), size)
        .await;
    Json(page.into())
}
