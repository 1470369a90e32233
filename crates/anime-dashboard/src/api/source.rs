//! Query types and the data-source trait the dashboard fetches through.

use super::error::ApiError;
use async_trait::async_trait;
use shared::{AnimeSummary, AnimeType, TopFilter};

/// Parameters for `GET /anime`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub types: Vec<AnimeType>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_types(mut self, types: &[AnimeType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs; adult content is always filtered out
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.text.clone()), ("sfw", "true".to_string())];
        if !self.types.is_empty() {
            let types: Vec<_> = self.types.iter().map(|t| t.api_value()).collect();
            params.push(("type", types.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Parameters for `GET /top/anime`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopQuery {
    pub filter: TopFilter,
    pub anime_type: Option<AnimeType>,
}

impl TopQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(filter) = self.filter.api_value() {
            params.push(("filter", filter.to_string()));
        }
        if let Some(anime_type) = self.anime_type {
            params.push(("type", anime_type.api_value().to_string()));
        }
        params
    }
}

/// Source of anime records
///
/// Implemented by [`crate::api::JikanClient`]; tests substitute in-memory
/// sources.
#[async_trait]
pub trait AnimeSource: Send {
    /// Search anime by title
    async fn search(&mut self, query: &SearchQuery) -> Result<Vec<AnimeSummary>, ApiError>;

    /// Fetch a ranking list
    async fn top(&mut self, query: &TopQuery) -> Result<Vec<AnimeSummary>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let query = SearchQuery::new("Naruto")
            .with_types(&[AnimeType::Tv, AnimeType::Movie])
            .with_limit(5);

        assert_eq!(
            query.params(),
            vec![
                ("q", "Naruto".to_string()),
                ("sfw", "true".to_string()),
                ("type", "tv,movie".to_string()),
                ("limit", "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_without_filters() {
        let params = SearchQuery::new("Bleach").params();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_top_params() {
        assert!(TopQuery::default().params().is_empty());

        let query = TopQuery {
            filter: TopFilter::Popular,
            anime_type: Some(AnimeType::Ova),
        };
        assert_eq!(
            query.params(),
            vec![
                ("filter", "bypopularity".to_string()),
                ("type", "ova".to_string()),
            ]
        );
    }
}
