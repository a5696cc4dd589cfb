//! Getter methods for `CrawlJobConfig`

use super::types::CrawlJobConfig;
use crate::crawl_engine::link_processor::UrlFilter;

impl CrawlJobConfig {
    #[must_use]
    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    #[must_use]
    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    #[must_use]
    pub fn same_domain_only(&self) -> bool {
        self.same_domain_only
    }

    #[must_use]
    pub fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }

    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Pre-compiled include/exclude rules
    #[must_use]
    pub fn filter(&self) -> &UrlFilter {
        &self.filter
    }
}
