//! Engine-wide tunables
//!
//! Defaults come from [`crate::utils::constants`]; every value can be
//! overridden with a `with_*` method.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{
    CRAWL_FETCH_TIMEOUT_SECS, CRAWLER_USER_AGENT, DEFAULT_CHUNK_SIZE, DEFAULT_REQUEST_INTERVAL,
    HTML_CONTENT_TYPES, MAX_MARKDOWN_CHARS, MIN_CHUNK_SIZE, SCRAPE_FETCH_TIMEOUT_SECS,
    SCREENING_CHAR_BUDGET, TAGGING_CHAR_BUDGET,
};

/// Settings shared by every job run through one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Minimum spacing between two fetches of the same job
    pub request_interval: Duration,
    pub crawl_fetch_timeout: Duration,
    pub scrape_fetch_timeout: Duration,
    pub user_agent: String,
    pub screening_char_budget: usize,
    pub tagging_char_budget: usize,
    /// Passage budget in words
    pub chunk_size: usize,
    /// Words a passage needs before a heading may close it
    pub min_chunk_size: usize,
    pub max_markdown_chars: usize,
    pub html_content_types: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            request_interval: DEFAULT_REQUEST_INTERVAL,
            crawl_fetch_timeout: Duration::from_secs(CRAWL_FETCH_TIMEOUT_SECS),
            scrape_fetch_timeout: Duration::from_secs(SCRAPE_FETCH_TIMEOUT_SECS),
            user_agent: CRAWLER_USER_AGENT.to_string(),
            screening_char_budget: SCREENING_CHAR_BUDGET,
            tagging_char_budget: TAGGING_CHAR_BUDGET,
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_chunk_size: MIN_CHUNK_SIZE,
            max_markdown_chars: MAX_MARKDOWN_CHARS,
            html_content_types: HTML_CONTENT_TYPES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    #[must_use]
    pub fn with_crawl_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.crawl_fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_scrape_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.scrape_fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_screening_char_budget(mut self, chars: usize) -> Self {
        self.screening_char_budget = chars;
        self
    }

    #[must_use]
    pub fn with_tagging_char_budget(mut self, chars: usize) -> Self {
        self.tagging_char_budget = chars;
        self
    }

    /// Set the passage budget and the heading-break minimum, both in words
    #[must_use]
    pub fn with_chunking(mut self, chunk_size: usize, min_chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self.min_chunk_size = min_chunk_size;
        self
    }

    #[must_use]
    pub fn with_max_markdown_chars(mut self, chars: usize) -> Self {
        self.max_markdown_chars = chars;
        self
    }

    #[must_use]
    pub fn with_html_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.html_content_types = types.into_iter().map(Into::into).collect();
        self
    }
}
