//! Request and response types of the crawl service

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunking::ContentChunk;
use crate::config::{ConfigError, CrawlJobConfig};
use crate::fetch::FetchError;
use crate::registry::{JobId, RegistryError};
use crate::screening::{ScreeningResult, TagSuggestions};
use crate::utils::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS, UrlError};

/// Submission of a crawl job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub url: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: u8,
    #[serde(default = "default_max_urls")]
    pub max_urls: usize,
    #[serde(default = "default_same_domain_only")]
    pub same_domain_only: bool,
    #[serde(default)]
    pub include_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_max_depth() -> u8 {
    DEFAULT_MAX_DEPTH
}

fn default_max_urls() -> usize {
    DEFAULT_MAX_URLS
}

fn default_same_domain_only() -> bool {
    true
}

impl CrawlRequest {
    /// A request for `url` with default limits
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls: DEFAULT_MAX_URLS,
            same_domain_only: true,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Validate into an immutable job configuration.
    pub fn into_config(self) -> Result<CrawlJobConfig, ConfigError> {
        CrawlJobConfig::builder()
            .seed_url(self.url)
            .max_depth(self.max_depth)
            .max_urls(self.max_urls)
            .same_domain_only(self.same_domain_only)
            .include_patterns(self.include_patterns)
            .exclude_patterns(self.exclude_patterns)
            .build()
    }
}

/// Single-page scrape request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    /// Caller-supplied tags, returned under the `hint` category
    #[serde(default)]
    pub tags: Vec<String>,
    /// Split the readable markdown into passages
    #[serde(default)]
    pub chunk: bool,
    /// Ask the classifier for tag suggestions
    #[serde(default)]
    pub suggest_tags: bool,
}

impl ScrapeRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeMetadata {
    /// Characters of readable markdown before the size cap
    pub content_length: usize,
    pub status_code: u16,
    /// Bytes of HTML received
    pub raw_html_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    /// Canonical form of the requested URL
    pub url: String,
    pub title: String,
    pub markdown: String,
    pub suggested_tags: TagSuggestions,
    pub screening: ScreeningResult,
    pub chunks: Vec<ContentChunk>,
    pub metadata: ScrapeMetadata,
}

/// Links found on one page, without creating a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLinks {
    pub url: String,
    pub links: Vec<String>,
    pub total: usize,
}

/// Errors surfaced by [`super::CrawlService`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{url} is not an HTML page ({content_type})")]
    NotHtml { url: String, content_type: String },
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => Self::NotFound(id),
        }
    }
}
