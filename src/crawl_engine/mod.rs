//! Crawl Engine Module
//!
//! Frontier traversal, link filtering, per-page processing and request
//! pacing for crawl jobs.

// Sub-modules
pub mod content_validator;
pub mod crawl_types;
pub mod link_processor;
pub mod orchestrator;
pub mod page_processor;
pub mod rate_limiter;

// Re-export orchestration types
pub use orchestrator::CrawlEngine;
pub use page_processor::{ContentPipeline, HtmlFetchError, PageOutcome};

// Re-export link handling
pub use link_processor::{Frontier, UrlFilter, UrlPattern, extract_links, is_eligible};

// Re-export rate limiter types
pub use rate_limiter::{RateLimitDecision, RequestPacer};

// Re-export content validator types
pub use content_validator::{ContentValidationResult, validate_content_type};

// Re-export crawl types
pub use crawl_types::{CrawlError, CrawlResult, FrontierEntry};
