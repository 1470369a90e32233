//! Errors returned by the Jikan client.

use reqwest::StatusCode;

/// Failure of a single outbound fetch
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx HTTP response
    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// HTTP 200 whose body reports an error instead of data
    #[error("API error: {0}")]
    Api(String),

    /// Body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True when the provider rejected the call for exceeding its quota
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed with status 404 Not Found: missing");
        assert!(!err.is_rate_limited());

        let err = ApiError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(err.is_rate_limited());
    }
}
