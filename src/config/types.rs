//! Core configuration types for crawl jobs
//!
//! `CrawlJobConfig` is immutable once built. The include/exclude patterns are
//! kept in their raw form for reporting and compiled once into a
//! [`UrlFilter`] for the hot path.

use serde::Serialize;
use thiserror::Error;

use crate::crawl_engine::link_processor::UrlFilter;
use crate::utils::UrlError;

/// Configuration of a single crawl job
#[derive(Debug, Clone, Serialize)]
pub struct CrawlJobConfig {
    /// Canonical seed URL
    pub(crate) seed_url: String,
    /// Link hops followed from the seed; the seed itself is depth 0
    pub(crate) max_depth: u8,
    /// Maximum number of pages processed
    pub(crate) max_urls: usize,
    pub(crate) same_domain_only: bool,
    pub(crate) include_patterns: Vec<String>,
    pub(crate) exclude_patterns: Vec<String>,

    /// Compiled form of `include_patterns` / `exclude_patterns`
    #[serde(skip)]
    pub(crate) filter: UrlFilter,
}

/// Reasons a job configuration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeedUrl(#[from] UrlError),

    #[error("max_urls must be between 1 and {max}, got {value}")]
    InvalidMaxUrls { value: usize, max: usize },

    #[error("max_depth must be at most {max}, got {value}")]
    InvalidMaxDepth { value: u8, max: u8 },
}
