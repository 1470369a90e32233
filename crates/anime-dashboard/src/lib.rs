//! Anime dashboard library for exploring MyAnimeList data.
//!
//! This library fetches anime from the Jikan API v4 behind a sliding-window
//! rate limiter, caches autosuggest results for a short TTL, and derives
//! search, ranking and comparison insights with CSV export.

pub mod api;
pub mod cache;
pub mod dashboard;
pub mod export;
pub mod stats;

pub use api::{AnimeSource, ApiError, JikanClient, RateLimiter};
pub use cache::SuggestionCache;
pub use dashboard::{CompareOutcome, Dashboard, DashboardSettings, ResultSet, SearchRequest, TopRequest};
