//! Shared configuration constants for kbcrawl
//!
//! Default values used throughout the crate. Every constant here has an
//! override point on [`crate::config::EngineSettings`] or the job builder.

use std::time::Duration;

/// Polite delay between two fetches of the same job: one request per second.
///
/// Override with `EngineSettings::with_request_interval`.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Fetch timeout used while traversing a crawl frontier.
pub const CRAWL_FETCH_TIMEOUT_SECS: u64 = 15;

/// Fetch timeout used by the standalone single-page scrape.
pub const SCRAPE_FETCH_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects followed by the HTTP fetcher.
pub const MAX_REDIRECTS: usize = 10;

/// Identifying user agent sent with every fetch.
pub const CRAWLER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; kbcrawl/0.1; +https://github.com/kbcrawl/kbcrawl)";

/// `Accept` header sent with every fetch.
pub const HTML_ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Content types treated as crawlable HTML.
///
/// Override with `EngineSettings::with_html_content_types`.
pub const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Default maximum crawl depth: 2 link hops from the seed.
pub const DEFAULT_MAX_DEPTH: u8 = 2;

/// Default URL budget per job.
pub const DEFAULT_MAX_URLS: usize = 30;

/// Upper bound accepted for `max_depth`.
pub const MAX_ALLOWED_DEPTH: u8 = 10;

/// Upper bound accepted for `max_urls`.
pub const MAX_ALLOWED_URLS: usize = 1000;

/// Characters of page text submitted for screening.
pub const SCREENING_CHAR_BUDGET: usize = 6000;

/// Characters of page text submitted for tag extraction.
pub const TAGGING_CHAR_BUDGET: usize = 8000;

/// Quality score assigned when screening is unavailable.
pub const NEUTRAL_QUALITY_SCORE: u8 = 3;

/// Passage size budget for chunking, in words.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// A heading only forces a passage break once the passage holds this many words.
pub const MIN_CHUNK_SIZE: usize = 100;

/// Readable markdown returned by a scrape is capped at this many characters.
pub const MAX_MARKDOWN_CHARS: usize = 20_000;

/// Terminal jobs are swept from the registry after this long.
pub const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

/// How often the retention sweep runs.
pub const JOB_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Tag categories always present in a scrape's suggested tags.
pub const TAG_CATEGORIES: &[&str] = &["modality", "population", "risk_factors"];

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "kbcrawl";
