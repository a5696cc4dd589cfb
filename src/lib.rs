//! kbcrawl: breadth-first site crawler feeding a screened knowledge base
//!
//! A crawl job starts from a seed URL, follows links breadth-first within
//! depth and URL budgets, and runs every page through a content pipeline
//! (fetch, extract, screen). Job state lives in a [`JobRegistry`] that can be
//! queried while the job runs.

pub mod chunking;
pub mod config;
pub mod crawl_engine;
pub mod fetch;
pub mod page_extractor;
pub mod registry;
pub mod screening;
pub mod service;
pub mod utils;

pub use config::{ConfigError, CrawlJobConfig, EngineSettings};
pub use crawl_engine::{ContentPipeline, CrawlEngine, CrawlError, CrawlResult, UrlFilter};
pub use fetch::{FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use registry::{CrawlJob, JobId, JobRegistry, JobStatus, PageOutcomeKind, PageResult};
pub use screening::{ContentClassifier, LlmClassifier, NeutralClassifier, ScreeningResult};
pub use service::{CrawlRequest, CrawlService, ScrapeRequest, ScrapeResponse, ServiceError};
pub use utils::normalize_url;
