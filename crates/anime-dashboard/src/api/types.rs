//! Jikan API v4 response types.
//!
//! These types represent the JSON responses from the Jikan API. Only the
//! fields the dashboard displays are decoded; everything else is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::AnimeSummary;

/// Response envelope for list endpoints
///
/// Jikan can answer HTTP 200 with an error body instead of `data`, so every
/// field is optional and [`ApiEnvelope::error_message`] decides which case
/// applies.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<Vec<T>>,
    pub pagination: Option<Pagination>,
    pub message: Option<String>,
    pub error: Option<Value>,
    pub messages: Option<Value>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the error carried by the body, if the body is an error
    pub fn error_message(&self) -> Option<String> {
        let has_data = self.data.as_ref().is_some_and(|d| !d.is_empty());
        let looks_like_error =
            self.error.is_some() || self.message.is_some() || self.messages.is_some();
        if has_data || !looks_like_error {
            return None;
        }

        let from_messages = self
            .messages
            .as_ref()
            .and_then(|m| m.get("error"))
            .map(value_to_text);

        Some(
            from_messages
                .or_else(|| self.message.clone())
                .or_else(|| self.error.as_ref().map(value_to_text))
                .unwrap_or_else(|| "Unknown API error".to_string()),
        )
    }

    /// Consume the envelope, yielding the records (empty when absent)
    pub fn into_data(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Anime record as returned by `/anime` and `/top/anime`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub mal_id: u32,
    pub url: Option<String>,
    pub images: Option<AnimeImages>,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub duration: Option<String>,
    pub aired: Option<Aired>,
    pub year: Option<u32>,

    // Scores and rankings
    pub score: Option<f64>,
    pub rank: Option<u32>,
    pub members: Option<u64>,

    pub synopsis: Option<String>,

    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub studios: Vec<MalEntity>,
}

/// Anime images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeImages {
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Aired dates (only the preformatted string is used)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aired {
    pub from: Option<String>,
    pub to: Option<String>,
    pub string: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub name: String,
    pub url: Option<String>,
}

impl From<AnimeEntry> for AnimeSummary {
    fn from(entry: AnimeEntry) -> Self {
        let (image_url, small_image_url) = match entry.images {
            Some(images) => (images.jpg.image_url, images.jpg.small_image_url),
            None => (None, None),
        };

        AnimeSummary {
            mal_id: entry.mal_id,
            title: entry.title,
            title_english: entry.title_english,
            title_japanese: entry.title_japanese,
            image_url,
            small_image_url,
            synopsis: entry.synopsis,
            score: entry.score,
            members: entry.members,
            rank: entry.rank,
            anime_type: entry.anime_type,
            episodes: entry.episodes,
            status: entry.status,
            year: entry.year,
            duration: entry.duration,
            aired: entry.aired.and_then(|a| a.string),
            genres: entry.genres.into_iter().map(|g| g.name).collect(),
            studios: entry.studios.into_iter().map(|s| s.name).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "pagination": {"last_visible_page": 1, "has_next_page": false, "current_page": 1},
        "data": [{
            "mal_id": 20,
            "url": "https://myanimelist.net/anime/20/Naruto",
            "images": {"jpg": {
                "image_url": "https://cdn.myanimelist.net/images/anime/13/17405.jpg",
                "small_image_url": "https://cdn.myanimelist.net/images/anime/13/17405t.jpg",
                "large_image_url": null
            }},
            "title": "Naruto",
            "title_english": "Naruto",
            "title_japanese": "ナルト",
            "type": "TV",
            "episodes": 220,
            "status": "Finished Airing",
            "duration": "23 min per ep",
            "aired": {"from": "2002-10-03T00:00:00+00:00", "to": "2007-02-08T00:00:00+00:00", "string": "Oct 3, 2002 to Feb 8, 2007"},
            "score": 8.0,
            "rank": 660,
            "members": 2900000,
            "year": 2002,
            "synopsis": "Moments prior to Naruto Uzumaki's birth...",
            "genres": [{"mal_id": 1, "type": "anime", "name": "Action", "url": "u"}],
            "studios": [{"mal_id": 1, "type": "anime", "name": "Pierrot", "url": "u"}],
            "themes": []
        }]
    }"#;

    #[test]
    fn test_decode_search_body() {
        let envelope: ApiEnvelope<AnimeEntry> = serde_json::from_str(SEARCH_BODY).unwrap();
        assert!(envelope.error_message().is_none());

        let data = envelope.into_data();
        assert_eq!(data.len(), 1);

        let summary = AnimeSummary::from(data[0].clone());
        assert_eq!(summary.title, "Naruto");
        assert_eq!(summary.anime_type.as_deref(), Some("TV"));
        assert_eq!(summary.episodes, Some(220));
        assert_eq!(summary.aired.as_deref(), Some("Oct 3, 2002 to Feb 8, 2007"));
        assert_eq!(summary.genres, vec!["Action".to_string()]);
        assert_eq!(summary.studios, vec!["Pierrot".to_string()]);
        assert!(summary.small_image_url.unwrap().ends_with("17405t.jpg"));
    }

    #[test]
    fn test_missing_optional_fields() {
        let body = r#"{"data": [{"mal_id": 7, "title": "Untitled", "score": null, "episodes": null}]}"#;
        let envelope: ApiEnvelope<AnimeEntry> = serde_json::from_str(body).unwrap();
        let summary = AnimeSummary::from(envelope.into_data().remove(0));

        assert_eq!(summary.score, None);
        assert_eq!(summary.image_url, None);
        assert!(summary.genres.is_empty());
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let body = r#"{"pagination": {"last_visible_page": 1, "has_next_page": false}, "data": []}"#;
        let envelope: ApiEnvelope<AnimeEntry> = serde_json::from_str(body).unwrap();
        assert!(envelope.error_message().is_none());
        assert!(envelope.into_data().is_empty());
    }

    #[test]
    fn test_error_body_prefers_messages_error() {
        let body = r#"{
            "status": 400,
            "type": "ValidationException",
            "message": "Invalid or incomplete request.",
            "error": null,
            "messages": {"error": "The type must be one of: tv, movie"}
        }"#;
        let envelope: ApiEnvelope<AnimeEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(
            envelope.error_message().as_deref(),
            Some("The type must be one of: tv, movie")
        );
    }

    #[test]
    fn test_error_body_falls_back_to_message() {
        let body = r#"{"status": 500, "type": "ServerException", "message": "Upstream down", "error": "timeout"}"#;
        let envelope: ApiEnvelope<AnimeEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error_message().as_deref(), Some("Upstream down"));
    }
}
