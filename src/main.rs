use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use news_recommender::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        providers::newsdata::NewsDataProvider,
        recommendations::{RankingPolicy, RecommendSettings},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = NewsDataProvider::new(config.newsdata())?;
    let settings = RecommendSettings {
        max_results: config.max_results,
        seed_query_terms: config.seed_query_terms,
        policy: RankingPolicy {
            dedup_key: config.dedup_normalization,
            vector_text: config.vector_normalization,
        },
    };

    tracing::info!(
        max_results = settings.max_results,
        dedup_key = ?settings.policy.dedup_key,
        vector_text = ?settings.policy.vector_text,
        "Recommendation settings loaded"
    );

    let app = create_router(AppState::new(Arc::new(provider), settings));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
