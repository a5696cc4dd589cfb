//! Core types for crawl operations.
//!
//! Error types for the engine and the frontier entry type shared by the
//! link processor and the orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{JobStatus, RegistryError};

/// Engine-level failures.
///
/// Apart from `NotPending`, these end a job in `Failed`. Per-page problems
/// (transport errors, non-HTML responses, screening outages, rejections) are
/// recorded in the ledger and never surface here.
#[derive(Debug, Clone, Error)]
pub enum CrawlError {
    /// The job's own state disappeared or could not be updated
    #[error("Job state unavailable: {0}")]
    Registry(#[from] RegistryError),

    /// The seed URL cannot be canonicalized
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    /// Only PENDING jobs can be run; finished jobs are never restarted
    #[error("Job is {status:?}, only pending jobs can run")]
    NotPending { status: JobStatus },

    /// The engine task itself died (panic or abort)
    #[error("Engine fault: {0}")]
    EngineFault(String),
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// An item in the crawl frontier with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u8,
}

impl FrontierEntry {
    #[must_use]
    pub fn new(url: String, depth: u8) -> Self {
        Self { url, depth }
    }
}
