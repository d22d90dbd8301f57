use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{ArticlesResponse, ClickedArticle},
    routes::AppState,
    services::recommendations::{self, RecommendOutcome},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ClickedArticle>, JsonRejection>,
) -> AppResult<Json<ArticlesResponse>> {
    let Json(clicked) = payload.map_err(|rejection| {
        tracing::info!(
            request_id = %request_id,
            reason = %rejection.body_text(),
            "Rejected malformed recommendation body"
        );
        AppError::InvalidInput("Valid title is required".to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        has_description = clicked.description.is_some(),
        excluded_urls = clicked.clicked_urls.len(),
        "Processing recommendation request"
    );

    let outcome = recommendations::recommend_articles(
        state.news_provider.clone(),
        &state.settings,
        &clicked,
    )
    .await;

    let articles = match outcome {
        RecommendOutcome::Recommended(articles) => articles,
        RecommendOutcome::NoCandidates => {
            tracing::info!(request_id = %request_id, "No candidate articles found");
            Vec::new()
        }
        RecommendOutcome::EmptyInput => {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }
        RecommendOutcome::InternalError(reason) => {
            return Err(AppError::Internal(reason));
        }
    };

    tracing::info!(
        request_id = %request_id,
        recommended = articles.len(),
        "Recommendation completed"
    );

    Ok(Json(ArticlesResponse::new(articles)))
}
