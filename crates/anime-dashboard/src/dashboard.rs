//! Dashboard views: search, rankings, autosuggest and comparison.
//!
//! [`Dashboard`] is the explicit context every view runs against. It owns the
//! data source (and with it the rate limiter), the suggestion cache and the
//! view defaults. Fetch failures never escape a view: they are logged and
//! turned into a user-visible warning over an empty result set.

use crate::api::{AnimeSource, ApiError, SearchQuery, TopQuery};
use crate::cache::SuggestionCache;
use crate::stats::{self, Comparison, HistogramBin};
use shared::{AnimeSummary, AnimeType, Config, Suggestion, TopFilter};
use std::time::Duration;
use tracing::{error, info, warn};

const HISTOGRAM_BINS: usize = 20;

/// View defaults
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub search_min_score: f64,
    pub top_min_score: f64,
    pub average_episode_minutes: u32,
    pub suggestion_limit: u32,
    pub suggestion_ttl: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DashboardSettings {
    fn from(config: &Config) -> Self {
        Self {
            search_min_score: config.dashboard.search_min_score,
            top_min_score: config.dashboard.top_min_score,
            average_episode_minutes: config.dashboard.average_episode_minutes,
            suggestion_limit: config.suggestions.limit,
            suggestion_ttl: Duration::from_secs(config.suggestions.ttl_seconds),
        }
    }
}

/// Search view input
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub min_score: f64,
    pub types: Vec<AnimeType>,
}

/// Rankings view input
#[derive(Debug, Clone)]
pub struct TopRequest {
    pub filter: TopFilter,
    pub anime_type: Option<AnimeType>,
    pub min_score: f64,
}

/// Summary metrics over a displayed result set
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub entries: usize,
    pub mean_score: Option<f64>,
    pub most_common_type: Option<(String, usize)>,
    pub total_members: u64,
    pub type_distribution: Vec<(String, usize)>,
    pub histogram: Vec<HistogramBin>,
}

impl Insights {
    pub fn from_results(anime: &[AnimeSummary]) -> Self {
        Self {
            entries: anime.len(),
            mean_score: stats::mean_score(anime),
            most_common_type: stats::most_common_type(anime),
            total_members: stats::total_members(anime),
            type_distribution: stats::type_distribution(anime),
            histogram: stats::score_histogram(anime, HISTOGRAM_BINS),
        }
    }
}

/// Result of the search and rankings views
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub anime: Vec<AnimeSummary>,
    pub insights: Option<Insights>,
    pub warning: Option<String>,
}

impl ResultSet {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            warning: Some(message.into()),
            ..Default::default()
        }
    }

    fn filtered(results: Vec<AnimeSummary>, min_score: f64, empty_warning: &str) -> Self {
        let anime: Vec<AnimeSummary> = results
            .into_iter()
            .filter(|a| a.score.is_some_and(|score| score >= min_score))
            .collect();

        if anime.is_empty() {
            info!(min_score = min_score, "No results after filtering");
            return Self::warning(empty_warning);
        }

        Self {
            insights: Some(Insights::from_results(&anime)),
            anime,
            warning: None,
        }
    }
}

/// Two resolved titles and how they compare
#[derive(Debug, Clone)]
pub struct Matchup {
    pub left: AnimeSummary,
    pub right: AnimeSummary,
    pub comparison: Comparison,
}

/// Result of the comparison view
#[derive(Debug, Clone, Default)]
pub struct CompareOutcome {
    pub matchup: Option<Matchup>,
    pub warning: Option<String>,
}

/// Explicit dashboard context
pub struct Dashboard<S: AnimeSource> {
    source: S,
    suggestions: SuggestionCache,
    settings: DashboardSettings,
}

impl<S: AnimeSource> Dashboard<S> {
    pub fn new(source: S, settings: DashboardSettings) -> Self {
        Self {
            suggestions: SuggestionCache::new(settings.suggestion_ttl),
            source,
            settings,
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn suggestion_cache(&self) -> &SuggestionCache {
        &self.suggestions
    }

    /// Search anime by title, keeping results at or above the minimum score
    pub async fn search(&mut self, request: &SearchRequest) -> ResultSet {
        let text = request.query.trim();
        if text.is_empty() {
            return ResultSet::default();
        }

        info!(
            query = %text,
            min_score = request.min_score,
            types = ?request.types,
            "Searching for anime"
        );

        let query = SearchQuery::new(text).with_types(&request.types);
        match self.source.search(&query).await {
            Ok(results) if results.is_empty() => {
                warn!(query = %text, "No results found for query");
                ResultSet::warning("No results found. Try a different search term.")
            }
            Ok(results) => {
                ResultSet::filtered(results, request.min_score, "No results match your filters.")
            }
            Err(e) => {
                error!(query = %text, error = %e, "Error in search view");
                ResultSet::warning(format!("An error occurred while searching: {}", e))
            }
        }
    }

    /// Fetch a ranking list, keeping entries at or above the minimum score
    pub async fn top(&mut self, request: &TopRequest) -> ResultSet {
        info!(
            category = %request.filter,
            anime_type = ?request.anime_type,
            min_score = request.min_score,
            "Loading top anime"
        );

        let query = TopQuery {
            filter: request.filter,
            anime_type: request.anime_type,
        };
        match self.source.top(&query).await {
            Ok(results) if results.is_empty() => {
                warn!("No data received from top anime API");
                ResultSet::warning("Unable to fetch top anime at the moment.")
            }
            Ok(results) => {
                ResultSet::filtered(results, request.min_score, "No anime match your current filters.")
            }
            Err(e) => {
                error!(error = %e, "Error in top anime view");
                ResultSet::warning(format!("An error occurred while fetching top anime: {}", e))
            }
        }
    }

    /// Autosuggest titles for a partially typed query
    ///
    /// Results are cached per normalized query for the configured TTL.
    /// Failures are logged and produce an empty list.
    pub async fn suggest(&mut self, term: &str) -> Vec<Suggestion> {
        let limit = self.settings.suggestion_limit;
        let source = &mut self.source;

        let result = self
            .suggestions
            .get_or_fetch(term, move |query| async move {
                let results = source.search(&SearchQuery::new(query).with_limit(limit)).await?;
                Ok::<Vec<Suggestion>, ApiError>(results.iter().map(Suggestion::from).collect())
            })
            .await;

        match result {
            Ok(suggestions) => suggestions,
            Err(e) => {
                error!(term = %term, error = %e, "Error fetching suggestions");
                Vec::new()
            }
        }
    }

    /// Compare the best match for each of two titles
    pub async fn compare(&mut self, left: &str, right: &str) -> CompareOutcome {
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            return CompareOutcome {
                matchup: None,
                warning: Some("Select two anime to compare.".to_string()),
            };
        }

        info!(left = %left, right = %right, "Comparing anime");

        let left_result = self.source.search(&SearchQuery::new(left).with_limit(1)).await;
        let right_result = self.source.search(&SearchQuery::new(right).with_limit(1)).await;

        let (left_hits, right_hits) = match (left_result, right_result) {
            (Ok(l), Ok(r)) => (l, r),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Error in compare view");
                return CompareOutcome {
                    matchup: None,
                    warning: Some(format!("An error occurred while comparing anime: {}", e)),
                };
            }
        };

        match (left_hits.into_iter().next(), right_hits.into_iter().next()) {
            (Some(l), Some(r)) => {
                let comparison = stats::compare(&l, &r, self.settings.average_episode_minutes);
                CompareOutcome {
                    matchup: Some(Matchup {
                        left: l,
                        right: r,
                        comparison,
                    }),
                    warning: None,
                }
            }
            _ => {
                warn!(left = %left, right = %right, "Anime not found");
                CompareOutcome {
                    matchup: None,
                    warning: Some("One or both anime not found. Please check the titles.".to_string()),
                }
            }
        }
    }
}
