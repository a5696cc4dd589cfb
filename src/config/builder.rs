//! Type-safe builder for `CrawlJobConfig` using the typestate pattern
//!
//! `build()` only exists once a seed URL has been supplied.
//!
//! ```
//! use kbcrawl::config::CrawlJobConfig;
//!
//! let config = CrawlJobConfig::builder()
//!     .seed_url("example.com/docs/")
//!     .max_depth(1)
//!     .exclude_patterns(["login"])
//!     .build()
//!     .unwrap();
//! assert_eq!(config.seed_url(), "https://example.com/docs");
//! ```

use std::marker::PhantomData;

use super::types::{ConfigError, CrawlJobConfig};
use crate::crawl_engine::link_processor::UrlFilter;
use crate::utils::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS, MAX_ALLOWED_DEPTH, MAX_ALLOWED_URLS, normalize_url,
};

// Type states for the builder
pub struct WithSeedUrl;

pub struct CrawlJobConfigBuilder<State = ()> {
    pub(crate) seed_url: Option<String>,
    pub(crate) max_depth: u8,
    pub(crate) max_urls: usize,
    pub(crate) same_domain_only: bool,
    pub(crate) include_patterns: Vec<String>,
    pub(crate) exclude_patterns: Vec<String>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for CrawlJobConfigBuilder<()> {
    fn default() -> Self {
        Self {
            seed_url: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls: DEFAULT_MAX_URLS,
            same_domain_only: true,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            _phantom: PhantomData,
        }
    }
}

impl CrawlJobConfig {
    /// Create a builder for configuring a `CrawlJobConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CrawlJobConfigBuilder<()> {
        CrawlJobConfigBuilder::default()
    }
}

impl CrawlJobConfigBuilder<()> {
    /// Set the seed URL. Input without a scheme is treated as `https://`.
    pub fn seed_url(self, url: impl Into<String>) -> CrawlJobConfigBuilder<WithSeedUrl> {
        let url_string = url.into().trim().to_string();

        let with_scheme = if url_string.contains("://") {
            url_string
        } else {
            format!("https://{url_string}")
        };

        CrawlJobConfigBuilder {
            seed_url: Some(with_scheme),
            max_depth: self.max_depth,
            max_urls: self.max_urls,
            same_domain_only: self.same_domain_only,
            include_patterns: self.include_patterns,
            exclude_patterns: self.exclude_patterns,
            _phantom: PhantomData,
        }
    }
}

// Build method only available once the seed is set
impl CrawlJobConfigBuilder<WithSeedUrl> {
    pub fn build(self) -> Result<CrawlJobConfig, ConfigError> {
        let raw_seed = self.seed_url.unwrap_or_default();
        let seed_url = normalize_url(&raw_seed, None)?;

        if self.max_urls == 0 || self.max_urls > MAX_ALLOWED_URLS {
            return Err(ConfigError::InvalidMaxUrls {
                value: self.max_urls,
                max: MAX_ALLOWED_URLS,
            });
        }
        if self.max_depth > MAX_ALLOWED_DEPTH {
            return Err(ConfigError::InvalidMaxDepth {
                value: self.max_depth,
                max: MAX_ALLOWED_DEPTH,
            });
        }

        let filter = UrlFilter::new(&self.exclude_patterns, &self.include_patterns);

        Ok(CrawlJobConfig {
            seed_url,
            max_depth: self.max_depth,
            max_urls: self.max_urls,
            same_domain_only: self.same_domain_only,
            include_patterns: filter.include_patterns(),
            exclude_patterns: filter.exclude_patterns(),
            filter,
        })
    }
}

// Builder methods available at any state
impl<State> CrawlJobConfigBuilder<State> {
    #[must_use]
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls;
        self
    }

    /// Restrict discovered links to the seed's host (default: `true`)
    #[must_use]
    pub fn same_domain_only(mut self, same_domain_only: bool) -> Self {
        self.same_domain_only = same_domain_only;
        self
    }

    /// Only follow URLs matching at least one of these patterns
    #[must_use]
    pub fn include_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Never follow URLs matching any of these patterns
    #[must_use]
    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }
}
