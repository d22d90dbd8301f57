use serde::Deserialize;

use crate::services::text::Normalization;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// NewsData.io API key
    pub newsdata_api_key: String,

    /// NewsData.io API base URL
    #[serde(default = "default_newsdata_api_url")]
    pub newsdata_api_url: String,

    /// Language filter sent with every provider request
    #[serde(default = "default_news_language")]
    pub news_language: String,

    /// Candidate pool size requested from the provider
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Number of leading title terms used as the seed query
    #[serde(default = "default_seed_query_terms")]
    pub seed_query_terms: usize,

    /// Provider HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Normalization applied to titles before comparing dedup keys
    #[serde(default = "default_dedup_normalization")]
    pub dedup_normalization: Normalization,

    /// Normalization applied to article text before vectorization
    #[serde(default = "default_vector_normalization")]
    pub vector_normalization: Normalization,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Credentials and endpoint for the NewsData.io provider
#[derive(Debug, Clone)]
pub struct NewsDataConfig {
    pub api_key: String,
    pub api_url: String,
    pub language: String,
    pub timeout_secs: u64,
}

fn default_newsdata_api_url() -> String {
    "https://newsdata.io/api/1".to_string()
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_max_results() -> usize {
    10
}

fn default_seed_query_terms() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_dedup_normalization() -> Normalization {
    Normalization::Light
}

fn default_vector_normalization() -> Normalization {
    Normalization::Full
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Provider settings split out so the provider never reads process-wide state
    pub fn newsdata(&self) -> NewsDataConfig {
        NewsDataConfig {
            api_key: self.newsdata_api_key.clone(),
            api_url: self.newsdata_api_url.clone(),
            language: self.news_language.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }
}
