//! Jikan API client with rate limiting.

use super::error::ApiError;
use super::rate_limiter::RateLimiter;
use super::source::{AnimeSource, SearchQuery, TopQuery};
use super::types::{AnimeEntry, ApiEnvelope};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::config::JikanConfig;
use shared::AnimeSummary;
use std::time::Duration;
use tracing::{debug, info, warn};

type Params = [(&'static str, String)];

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
    /// Rate limiter
    rate_limiter: RateLimiter,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(config: &JikanConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(
                config.rate_limit.requests_per_second,
                config.rate_limit.requests_per_minute,
            ),
        })
    }

    /// Make a rate-limited GET request and decode the envelope
    async fn request(&mut self, endpoint: &str, params: &Params) -> Result<ApiEnvelope<AnimeEntry>, ApiError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);
        info!(url = %url, params = ?params, "Making API request");

        let response = match self.client.get(&url).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Request error");
                return Err(ApiError::Network(e));
            }
        };

        let status = response.status();
        debug!(url = %url, status = %status, "API response status");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = ApiError::Status { status, body };
            if err.is_rate_limited() {
                warn!(url = %url, "Rate limited by server");
            } else {
                warn!(url = %url, error = %err, "Request failed");
            }
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse response");
            ApiError::Decode(e.to_string())
        })
    }

    /// Fetch a list endpoint, handling error bodies delivered with HTTP 200
    async fn get_list(&mut self, endpoint: &str, params: &Params) -> Result<Vec<AnimeEntry>, ApiError> {
        let envelope = self.request(endpoint, params).await?;

        let Some(message) = envelope.error_message() else {
            let data = envelope.into_data();
            debug!(endpoint = endpoint, count = data.len(), "API returned results");
            return Ok(data);
        };

        warn!(endpoint = endpoint, error = %message, "API returned error");

        let Some(simplified) = simplified_search_params(params) else {
            return Err(ApiError::Api(message));
        };

        info!(endpoint = endpoint, "Retrying with simplified parameters");
        let envelope = self.request(endpoint, &simplified).await?;
        match envelope.error_message() {
            Some(message) => Err(ApiError::Api(message)),
            None => Ok(envelope.into_data()),
        }
    }

    /// Search anime by title
    pub async fn search_anime(&mut self, query: &SearchQuery) -> Result<Vec<AnimeEntry>, ApiError> {
        info!(query = %query.text, "Searching anime");
        self.get_list("/anime", &query.params()).await
    }

    /// Fetch top anime for a ranking category
    pub async fn top_anime(&mut self, query: &TopQuery) -> Result<Vec<AnimeEntry>, ApiError> {
        info!(filter = %query.filter, "Fetching top anime");
        self.get_list("/top/anime", &query.params()).await
    }

    /// Get current rate limit statistics as (used, allowed) for the minute window
    pub fn rate_limit_stats(&mut self) -> (usize, usize) {
        (
            self.rate_limiter.current_minute_count(),
            self.rate_limiter.max_per_minute(),
        )
    }
}

/// A search carrying filters besides `q` is retried with `q` alone
fn simplified_search_params(params: &Params) -> Option<Vec<(&'static str, String)>> {
    if params.len() <= 1 {
        return None;
    }
    params
        .iter()
        .find(|(key, _)| *key == "q")
        .map(|(_, q)| vec![("q", q.clone())])
}

#[async_trait]
impl AnimeSource for JikanClient {
    async fn search(&mut self, query: &SearchQuery) -> Result<Vec<AnimeSummary>, ApiError> {
        let entries = self.search_anime(query).await?;
        Ok(entries.into_iter().map(AnimeSummary::from).collect())
    }

    async fn top(&mut self, query: &TopQuery) -> Result<Vec<AnimeSummary>, ApiError> {
        let entries = self.top_anime(query).await?;
        Ok(entries.into_iter().map(AnimeSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AnimeType, Config, TopFilter};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned `(status line, body)` responses, one per connection, and
    /// record each request line.
    async fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let request = String::from_utf8_lossy(&request);
                let request_line = request.lines().next().unwrap_or_default().to_string();
                recorder.lock().unwrap().push(request_line);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{}/v4", addr), seen)
    }

    fn client_for(base_url: String) -> JikanClient {
        let mut config = Config::default().jikan;
        config.base_url = base_url;
        config.rate_limit.requests_per_second = 100;
        config.rate_limit.requests_per_minute = 100;
        JikanClient::new(&config).unwrap()
    }

    const ONE_RESULT: &str = r#"{"data": [{"mal_id": 20, "title": "Naruto", "type": "TV", "score": 8.0}]}"#;
    const ERROR_BODY: &str = r#"{"status": 400, "type": "ValidationException", "message": "Invalid request", "error": null}"#;

    #[tokio::test]
    async fn test_client_creation() {
        let client = JikanClient::new(&Config::default().jikan);
        assert!(client.is_ok());
    }

    #[test]
    fn test_simplified_search_params() {
        let params = SearchQuery::new("Naruto").with_types(&[AnimeType::Tv]).params();
        assert_eq!(
            simplified_search_params(&params),
            Some(vec![("q", "Naruto".to_string())])
        );

        assert_eq!(simplified_search_params(&[("q", "x".to_string())]), None);
        assert_eq!(simplified_search_params(&TopQuery::default().params()), None);
    }

    #[tokio::test]
    async fn test_search_decodes_summaries() {
        let (base_url, seen) = serve(vec![("200 OK", ONE_RESULT)]).await;
        let mut client = client_for(base_url);

        let results = client.search(&SearchQuery::new("Naruto")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Naruto");

        let seen = seen.lock().unwrap();
        assert!(seen[0].starts_with("GET /v4/anime?q=Naruto&sfw=true"));
        assert_eq!(client.rate_limit_stats(), (1, 100));
    }

    #[tokio::test]
    async fn test_error_body_retries_with_query_only() {
        let (base_url, seen) = serve(vec![("200 OK", ERROR_BODY), ("200 OK", ONE_RESULT)]).await;
        let mut client = client_for(base_url);

        let query = SearchQuery::new("Naruto").with_types(&[AnimeType::Tv]);
        let results = client.search(&query).await.unwrap();
        assert_eq!(results.len(), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("type=tv"));
        assert!(seen[1].starts_with("GET /v4/anime?q=Naruto HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_error_body_without_filters_is_api_error() {
        let (base_url, _seen) = serve(vec![("200 OK", ERROR_BODY)]).await;
        let mut client = client_for(base_url);

        let query = TopQuery {
            filter: TopFilter::All,
            anime_type: None,
        };
        let err = client.top(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(ref m) if m == "Invalid request"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (base_url, _seen) = serve(vec![("503 Service Unavailable", "{}")]).await;
        let mut client = client_for(base_url);

        let err = client.top(&TopQuery::default()).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Status { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (base_url, _seen) = serve(vec![("200 OK", "not json")]).await;
        let mut client = client_for(base_url);

        let err = client.top(&TopQuery::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
