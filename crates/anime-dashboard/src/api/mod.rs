//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited client for the Jikan API (the
//! unofficial MyAnimeList API) and the [`AnimeSource`] trait the dashboard
//! fetches through.

pub mod client;
pub mod error;
pub mod rate_limiter;
pub mod source;
pub mod types;

pub use client::JikanClient;
pub use error::ApiError;
pub use rate_limiter::RateLimiter;
pub use source::{AnimeSource, SearchQuery, TopQuery};
pub use types::*;
