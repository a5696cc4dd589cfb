//! Fetch contract shared by all fetcher implementations

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched (2xx) response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Declared `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Decoded response body
    pub body: String,
}

/// Transport-level fetch failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Connection, DNS, TLS or body read failure
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The request exceeded its time budget
    #[error("Timed out after {timeout_secs}s fetching {url}")]
    Timeout { url: String, timeout_secs: u64 },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fetches a single URL.
///
/// Implementations must follow redirects, honour `timeout`, and map non-2xx
/// responses to [`FetchError::HttpStatus`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}
