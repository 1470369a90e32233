//! Data models for the dashboard.
//!
//! This module defines the domain records every view works with: the
//! flattened anime summary, autosuggest entries, and the filter enums that
//! map user-facing labels onto Jikan query values.

use serde::{Deserialize, Serialize};

/// Anime format as exposed by MyAnimeList
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnimeType {
    Tv,
    Movie,
    Ova,
    Special,
    Ona,
    Music,
}

impl AnimeType {
    pub const ALL: [AnimeType; 6] = [
        AnimeType::Tv,
        AnimeType::Movie,
        AnimeType::Ova,
        AnimeType::Special,
        AnimeType::Ona,
        AnimeType::Music,
    ];

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            AnimeType::Tv => "TV",
            AnimeType::Movie => "Movie",
            AnimeType::Ova => "OVA",
            AnimeType::Special => "Special",
            AnimeType::Ona => "ONA",
            AnimeType::Music => "Music",
        }
    }

    /// Value accepted by the `type` query parameter
    pub fn api_value(&self) -> &'static str {
        match self {
            AnimeType::Tv => "tv",
            AnimeType::Movie => "movie",
            AnimeType::Ova => "ova",
            AnimeType::Special => "special",
            AnimeType::Ona => "ona",
            AnimeType::Music => "music",
        }
    }
}

impl std::fmt::Display for AnimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AnimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AnimeType::ALL
            .into_iter()
            .find(|t| t.api_value().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Invalid anime type: {}", s))
    }
}

/// Ranking category for the top anime view
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TopFilter {
    #[default]
    All,
    Airing,
    Popular,
    Upcoming,
}

impl TopFilter {
    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            TopFilter::All => "All Time Best",
            TopFilter::Airing => "Currently Airing",
            TopFilter::Popular => "Most Popular",
            TopFilter::Upcoming => "Upcoming Releases",
        }
    }

    /// Value for the `filter` query parameter (None = default ranking)
    pub fn api_value(&self) -> Option<&'static str> {
        match self {
            TopFilter::All => None,
            TopFilter::Airing => Some("airing"),
            TopFilter::Popular => Some("bypopularity"),
            TopFilter::Upcoming => Some("upcoming"),
        }
    }
}

impl std::fmt::Display for TopFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TopFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "best" => Ok(TopFilter::All),
            "airing" => Ok(TopFilter::Airing),
            "popular" | "bypopularity" => Ok(TopFilter::Popular),
            "upcoming" => Ok(TopFilter::Upcoming),
            other => Err(anyhow::anyhow!("Invalid ranking category: {}", other)),
        }
    }
}

/// Flattened anime record used by every view
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimeSummary {
    pub mal_id: u32,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Images
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,

    pub synopsis: Option<String>,

    // Scores and rankings
    pub score: Option<f64>,
    pub members: Option<u64>,
    pub rank: Option<u32>,

    // Format and airing
    pub anime_type: Option<String>,  // display label, e.g. "TV"
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub year: Option<u32>,
    pub duration: Option<String>,    // raw, e.g. "24 min per ep"
    pub aired: Option<String>,

    // Classifications
    pub genres: Vec<String>,
    pub studios: Vec<String>,
}

impl AnimeSummary {
    /// Score for head-to-head ranking (missing scores count as 0)
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    /// Format label, "Unknown" when absent
    pub fn type_label(&self) -> &str {
        self.anime_type.as_deref().unwrap_or("Unknown")
    }
}

/// Autosuggest entry shown while the user types a title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub mal_id: u32,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub small_image_url: Option<String>,
}

impl From<&AnimeSummary> for Suggestion {
    fn from(anime: &AnimeSummary) -> Self {
        Self {
            mal_id: anime.mal_id,
            title: anime.title.clone(),
            title_english: anime.title_english.clone(),
            title_japanese: anime.title_japanese.clone(),
            small_image_url: anime.small_image_url.clone(),
        }
    }
}
