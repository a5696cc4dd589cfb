//! Job registry: the shared store of crawl job state

pub mod job_registry;
pub mod types;

pub use job_registry::{JobRegistry, RegistryError};
pub use types::{CrawlJob, JobId, JobStatus, PageOutcomeKind, PageResult};
