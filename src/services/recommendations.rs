use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    models::{ArticleRecord, ClickedArticle, Recommendation},
    services::{
        dedup::{deduplicate, Deduplicated, UniqueCandidate},
        providers::NewsProvider,
        similarity::{score_corpus, Corpus},
        text::{self, Normalization},
    },
};

/// Candidates scoring below this are never recommended
pub const MIN_RELEVANCE: f64 = 0.1;

/// Upper bound on recommendations per request
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Which normalization feeds each stage of ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingPolicy {
    pub dedup_key: Normalization,
    pub vector_text: Normalization,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            dedup_key: Normalization::Light,
            vector_text: Normalization::Full,
        }
    }
}

impl RankingPolicy {
    /// Lightly normalized text still carries stopwords, so the vectorizer drops them
    fn exclude_stop_words(&self) -> bool {
        self.vector_text == Normalization::Light
    }
}

/// Everything the pipeline needs besides the provider
#[derive(Debug, Clone)]
pub struct RecommendSettings {
    pub max_results: usize,
    pub seed_query_terms: usize,
    pub policy: RankingPolicy,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            seed_query_terms: 5,
            policy: RankingPolicy::default(),
        }
    }
}

/// Result of one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendOutcome {
    /// Ranking ran; zero to three articles cleared every filter
    Recommended(Vec<Recommendation>),
    /// The clicked article had no usable title
    EmptyInput,
    /// The provider returned nothing with a title
    NoCandidates,
    /// Ranking broke an internal invariant
    InternalError(String),
}

impl RecommendOutcome {
    /// Articles to return, empty for every outcome except `Recommended`
    pub fn into_articles(self) -> Vec<Recommendation> {
        match self {
            RecommendOutcome::Recommended(articles) => articles,
            _ => Vec::new(),
        }
    }
}

/// A deduplicated candidate paired with its similarity to the clicked article
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: UniqueCandidate,
    pub score: f64,
}

/// Fetches candidates for the clicked article and ranks them
///
/// The title is validated before the provider is contacted.
#[tracing::instrument(skip_all, fields(excluded_urls = clicked.clicked_urls.len()))]
pub async fn recommend_articles(
    provider: Arc<dyn NewsProvider>,
    settings: &RecommendSettings,
    clicked: &ClickedArticle,
) -> RecommendOutcome {
    let Some(title) = clicked.trimmed_title() else {
        return RecommendOutcome::EmptyInput;
    };

    let query = seed_query(title, settings.seed_query_terms);
    let candidates = provider.search(&query, settings.max_results).await;

    tracing::debug!(
        query = %query,
        candidates = candidates.len(),
        provider = provider.name(),
        "Fetched recommendation candidates"
    );

    rank(clicked, candidates, &settings.policy)
}

/// Ranks already-fetched candidates against the clicked article
pub fn rank(
    clicked: &ClickedArticle,
    candidates: Vec<ArticleRecord>,
    policy: &RankingPolicy,
) -> RecommendOutcome {
    let Some(title) = clicked.trimmed_title() else {
        return RecommendOutcome::EmptyInput;
    };

    let fetched = candidates.len();
    let deduped = deduplicate(candidates, policy.dedup_key);
    if deduped.is_empty() {
        tracing::info!(fetched, untitled = deduped.untitled, "No usable candidates");
        return RecommendOutcome::NoCandidates;
    }

    let unique = deduped.len();
    let scored = score_candidates(clicked, deduped, policy);
    if let Some(bad) = scored.iter().find(|s| !s.score.is_finite()) {
        return RecommendOutcome::InternalError(format!(
            "non-finite similarity score for '{}'",
            bad.candidate.key
        ));
    }

    let excluded: HashSet<&str> = clicked.clicked_urls.iter().map(|u| u.trim()).collect();
    let recommendations = select(scored, &text::light(title), &excluded);

    tracing::info!(
        fetched,
        unique,
        recommended = recommendations.len(),
        "Ranking completed"
    );

    RecommendOutcome::Recommended(recommendations)
}

/// First `max_terms` whitespace-separated words of the title
pub fn seed_query(title: &str, max_terms: usize) -> String {
    title
        .split_whitespace()
        .take(max_terms.max(1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scores each unique candidate, keeping candidate and score together
pub fn score_candidates(
    clicked: &ClickedArticle,
    deduped: Deduplicated,
    policy: &RankingPolicy,
) -> Vec<ScoredCandidate> {
    let normalize = |text: &str| policy.vector_text.apply(text);

    let corpus = Corpus::new(
        normalize(&clicked.full_text()),
        deduped
            .candidates
            .iter()
            .map(|candidate| normalize(&candidate.record.full_text())),
    );
    let scores = score_corpus(&corpus, policy.exclude_stop_words());

    deduped
        .candidates
        .into_iter()
        .zip(scores)
        .map(|(candidate, score)| ScoredCandidate { candidate, score })
        .collect()
}

/// Orders by descending score (ties keep provider order) and applies the filters
fn select(
    mut scored: Vec<ScoredCandidate>,
    clicked_title: &str,
    excluded_urls: &HashSet<&str>,
) -> Vec<Recommendation> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    scored
        .iter()
        .filter(|s| s.score >= MIN_RELEVANCE)
        .filter(|s| {
            let title = s.candidate.record.title.as_deref().unwrap_or_default();
            text::light(title) != clicked_title
        })
        .filter(|s| {
            s.candidate
                .record
                .link
                .as_deref()
                .map_or(true, |link| !excluded_urls.contains(link.trim()))
        })
        .take(MAX_RECOMMENDATIONS)
        .map(|s| s.candidate.record.project())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockNewsProvider;
    use serde_json::json;

    fn titles(outcome: RecommendOutcome) -> Vec<String> {
        outcome
            .into_articles()
            .iter()
            .filter_map(|r| r.title().map(str::to_string))
            .collect()
    }

    fn space_candidates() -> Vec<ArticleRecord> {
        vec![
            ArticleRecord::new("Local bakery wins award").with_link("https://news/bakery"),
            ArticleRecord::new("NASA satellite launch successful").with_link("https://news/nasa-1"),
            ArticleRecord::new("New NASA satellite reaches orbit").with_link("https://news/nasa-2"),
            ArticleRecord::new("NASA satellite sends first images").with_link("https://news/nasa-3"),
            ArticleRecord::new("NASA launches satellite after delay").with_link("https://news/nasa-4"),
        ]
    }

    #[test]
    fn test_empty_candidates() {
        let clicked = ClickedArticle::new("Economy slows in Q3");
        let outcome = rank(&clicked, vec![], &RankingPolicy::default());

        assert_eq!(outcome, RecommendOutcome::NoCandidates);
        assert!(outcome.into_articles().is_empty());
    }

    #[test]
    fn test_self_match_and_threshold_exclusion() {
        let clicked = ClickedArticle::new("Cats are popular pets");
        let candidates = vec![
            ArticleRecord::new("Stock market rallies today"),
            ArticleRecord::new("Cats are popular pets"),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(outcome, RecommendOutcome::Recommended(vec![]));
    }

    #[test]
    fn test_shared_filler_words_do_not_relate_articles() {
        let clicked = ClickedArticle::new("First look at the iPhone");
        let candidates = vec![ArticleRecord::new("First day of school")];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(outcome, RecommendOutcome::Recommended(vec![]));
    }

    #[test]
    fn test_basic_ranking() {
        let clicked = ClickedArticle::new("NASA launches new satellite");
        let candidates = vec![
            ArticleRecord::new("NASA satellite launch successful"),
            ArticleRecord::new("Local bakery wins award"),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(titles(outcome), vec!["NASA satellite launch successful"]);
    }

    #[test]
    fn test_at_most_three_recommendations() {
        let clicked = ClickedArticle::new("NASA launches new satellite");
        let outcome = rank(&clicked, space_candidates(), &RankingPolicy::default());

        let recommended = titles(outcome);
        assert_eq!(recommended.len(), MAX_RECOMMENDATIONS);
        assert!(!recommended.contains(&"Local bakery wins award".to_string()));
    }

    #[test]
    fn test_excluded_urls_are_skipped() {
        let clicked = ClickedArticle::new("NASA launches new satellite")
            .with_clicked_url("https://news/nasa-1")
            .with_clicked_url("https://news/nasa-4");
        let outcome = rank(&clicked, space_candidates(), &RankingPolicy::default());

        for article in outcome.into_articles() {
            let link = article.link().unwrap();
            assert_ne!(link, "https://news/nasa-1");
            assert_ne!(link, "https://news/nasa-4");
        }
    }

    #[test]
    fn test_excluded_url_matches_after_trim() {
        let clicked = ClickedArticle::new("NASA launches new satellite")
            .with_clicked_url("https://news/nasa");
        let candidates = vec![
            ArticleRecord::new("NASA satellite launch successful").with_link("  https://news/nasa "),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(outcome, RecommendOutcome::Recommended(vec![]));
    }

    #[test]
    fn test_self_match_ignores_case_and_whitespace() {
        let clicked = ClickedArticle::new("  NASA Launches New Satellite ");
        let candidates = vec![
            ArticleRecord::new("nasa launches new satellite"),
            ArticleRecord::new("NASA satellite launch successful"),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(titles(outcome), vec!["NASA satellite launch successful"]);
    }

    #[test]
    fn test_duplicates_recommended_once() {
        let clicked = ClickedArticle::new("NASA launches new satellite");
        let candidates = vec![
            ArticleRecord::new("NASA satellite launch successful").with_link("https://a"),
            ArticleRecord::new("nasa satellite launch successful ").with_link("https://b"),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        let articles = outcome.into_articles();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link(), Some("https://a"));
    }

    #[test]
    fn test_results_sorted_by_descending_score() {
        let clicked = ClickedArticle::new("NASA launches new satellite");
        let policy = RankingPolicy::default();

        let deduped = deduplicate(space_candidates(), policy.dedup_key);
        let mut scored = score_candidates(&clicked, deduped, &policy);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        let expected: Vec<String> = scored
            .iter()
            .filter(|s| s.score >= MIN_RELEVANCE)
            .take(MAX_RECOMMENDATIONS)
            .map(|s| s.candidate.record.title.clone().unwrap())
            .collect();

        let outcome = rank(&clicked, space_candidates(), &policy);
        assert_eq!(titles(outcome), expected);
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let clicked = ClickedArticle::new("Election results");
        let candidates = vec![
            ArticleRecord::new("Election results tonight"),
            ArticleRecord::new("Election results live"),
            ArticleRecord::new("Election results coverage"),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(
            titles(outcome),
            vec![
                "Election results tonight",
                "Election results live",
                "Election results coverage"
            ]
        );
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let clicked = ClickedArticle::new("NASA launches new satellite")
            .with_description("The agency put a weather satellite into orbit");
        let first = rank(&clicked, space_candidates(), &RankingPolicy::default());
        let second = rank(&clicked, space_candidates(), &RankingPolicy::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_untitled_candidates_dropped() {
        let clicked = ClickedArticle::new("NASA launches new satellite");
        let candidates = vec![ArticleRecord::default().with_link("https://no-title")];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(outcome, RecommendOutcome::NoCandidates);
    }

    #[test]
    fn test_blank_title_is_empty_input() {
        let outcome = rank(
            &ClickedArticle::new("   "),
            space_candidates(),
            &RankingPolicy::default(),
        );
        assert_eq!(outcome, RecommendOutcome::EmptyInput);
    }

    #[test]
    fn test_degenerate_corpus_recommends_nothing() {
        let clicked = ClickedArticle::new("The and of");
        let candidates = vec![ArticleRecord::new("It is a"), ArticleRecord::new("!!!")];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(outcome, RecommendOutcome::Recommended(vec![]));
    }

    #[test]
    fn test_light_vector_policy_ignores_stopwords() {
        let policy = RankingPolicy {
            dedup_key: Normalization::Light,
            vector_text: Normalization::Light,
        };
        let clicked = ClickedArticle::new("The cats of the city");
        let candidates = vec![
            ArticleRecord::new("The dogs of the city"),
            ArticleRecord::new("The history of the world"),
        ];

        let outcome = rank(&clicked, candidates, &policy);
        assert_eq!(titles(outcome), vec!["The dogs of the city"]);
    }

    #[test]
    fn test_description_contributes_to_similarity() {
        let clicked = ClickedArticle::new("Big day for space")
            .with_description("NASA launches a new satellite");
        let candidates = vec![
            ArticleRecord::new("Agency update").with_description("NASA satellite launch successful"),
            ArticleRecord::new("Local bakery wins award"),
        ];

        let outcome = rank(&clicked, candidates, &RankingPolicy::default());
        assert_eq!(titles(outcome), vec!["Agency update"]);
    }

    #[test]
    fn test_projection_drops_unlisted_fields() {
        let clicked = ClickedArticle::new("NASA launches new satellite");
        let candidates = vec![ArticleRecord::new("NASA satellite launch successful")
            .with_metadata("source_id", json!("space_news"))
            .with_metadata("creator", json!(["Reporter"]))];

        let articles = rank(&clicked, candidates, &RankingPolicy::default()).into_articles();
        assert_eq!(articles.len(), 1);
        assert!(articles[0].fields().contains_key("source_id"));
        assert!(!articles[0].fields().contains_key("creator"));
    }

    #[test]
    fn test_seed_query_takes_leading_terms() {
        assert_eq!(
            seed_query("  India wins the cricket world cup final ", 5),
            "India wins the cricket world"
        );
        assert_eq!(seed_query("Short title", 5), "Short title");
        assert_eq!(seed_query("One two", 0), "One");
    }

    #[tokio::test]
    async fn test_recommend_articles_queries_provider_with_seed() {
        let mut provider = MockNewsProvider::new();
        provider
            .expect_search()
            .withf(|query, max_results| query == "NASA launches new satellite" && *max_results == 10)
            .times(1)
            .returning(|_, _| {
                vec![
                    ArticleRecord::new("NASA satellite launch successful"),
                    ArticleRecord::new("Local bakery wins award"),
                ]
            });
        provider.expect_name().return_const("mock");

        let clicked = ClickedArticle::new("NASA launches new satellite");
        let outcome =
            recommend_articles(Arc::new(provider), &RecommendSettings::default(), &clicked).await;

        assert_eq!(titles(outcome), vec!["NASA satellite launch successful"]);
    }

    #[test]
    fn test_recommend_articles_rejects_blank_title_before_fetch() {
        let mut provider = MockNewsProvider::new();
        provider.expect_search().times(0);

        let clicked = ClickedArticle::default();
        let outcome = tokio_test::block_on(recommend_articles(
            Arc::new(provider),
            &RecommendSettings::default(),
            &clicked,
        ));

        assert_eq!(outcome, RecommendOutcome::EmptyInput);
    }

    #[tokio::test]
    async fn test_recommend_articles_with_empty_provider() {
        let mut provider = MockNewsProvider::new();
        provider.expect_search().returning(|_, _| Vec::new());
        provider.expect_name().return_const("mock");

        let clicked = ClickedArticle::new("Economy slows in Q3");
        let outcome =
            recommend_articles(Arc::new(provider), &RecommendSettings::default(), &clicked).await;

        assert_eq!(outcome, RecommendOutcome::NoCandidates);
    }
}
