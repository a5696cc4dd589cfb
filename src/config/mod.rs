//! Configuration module for crawl jobs
//!
//! `CrawlJobConfig` describes one job and is built with a type-safe builder.
//! `EngineSettings` holds the tunables shared by every job.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod settings;
pub mod types;

// Re-exports for public API
pub use builder::{CrawlJobConfigBuilder, WithSeedUrl};
pub use settings::EngineSettings;
pub use types::{ConfigError, CrawlJobConfig};
