//! Error classification for Notion API requests
//!
//! The executor never propagates these past its own boundary; they exist so
//! the retry logic can tell a rate-limit signal apart from everything else.

use thiserror::Error;

/// Error code Notion attaches to 429 responses.
pub const RATE_LIMITED_CODE: &str = "rate_limited";

/// A structured error body returned by the Notion API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status of the response
    pub status: u16,
    /// Machine-readable error code (e.g. "rate_limited", "object_not_found")
    pub code: String,
    /// Human-readable message from the API
    pub message: String,
    /// Seconds to wait before retrying, from the Retry-After header
    pub retry_after: Option<f64>,
}

impl ApiError {
    /// Whether this error is a transient rate-limit signal
    pub fn is_rate_limited(&self) -> bool {
        self.code == RATE_LIMITED_CODE
    }
}

/// Failure of a single outbound request
#[derive(Debug, Error)]
pub enum RequestError {
    /// The API answered with a structured error body
    #[error("notion api error {} ({}): {}", .0.code, .0.status, .0.message)]
    Api(ApiError),
    /// The request never produced a parseable API response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
