//! Job submission/query surface and standalone page operations

pub mod crawl_service;
pub mod scrape;
pub mod types;

pub use crawl_service::{CrawlService, HealthStatus};
pub use scrape::HINT_TAG_CATEGORY;
pub use types::{
    CrawlRequest, DiscoveredLinks, ScrapeMetadata, ScrapeRequest, ScrapeResponse, ServiceError,
};
