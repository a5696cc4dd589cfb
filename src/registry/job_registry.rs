//! Concurrency-safe job registry
//!
//! Each entry pairs the job state with its cancellation token. The engine is
//! the only writer of a running job; status queries take a short read lock
//! and clone.

use dashmap::DashMap;
use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::types::{CrawlJob, JobId};
use crate::config::CrawlJobConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Job not found: {0}")]
    NotFound(JobId),
}

struct JobEntry {
    job: Arc<RwLock<CrawlJob>>,
    cancel: CancellationToken,
}

/// Shared handle to every known job. Clones share the same map.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<DashMap<JobId, JobEntry>>,
}

impl JobRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a PENDING job and return its id.
    pub fn create(&self, config: CrawlJobConfig) -> JobId {
        let id = Uuid::new_v4().to_string();
        let job = CrawlJob::new(id.clone(), config);
        self.jobs.insert(
            id.clone(),
            JobEntry {
                job: Arc::new(RwLock::new(job)),
                cancel: CancellationToken::new(),
            },
        );
        debug!(target: "kbcrawl::registry", "Created job {id}");
        id
    }

    fn state(&self, id: &str) -> Result<Arc<RwLock<CrawlJob>>, RegistryError> {
        self.jobs
            .get(id)
            .map(|entry| Arc::clone(&entry.job))
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Snapshot of one job
    pub fn get(&self, id: &str) -> Result<CrawlJob, RegistryError> {
        Ok(self.state(id)?.read().clone())
    }

    /// Snapshot of every job, oldest first
    #[must_use]
    pub fn list(&self) -> Vec<CrawlJob> {
        let states: Vec<_> = self
            .jobs
            .iter()
            .map(|entry| Arc::clone(&entry.job))
            .collect();
        let mut jobs: Vec<CrawlJob> = states.iter().map(|s| s.read().clone()).collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        jobs
    }

    /// Ask a job to stop. Idempotent; terminal jobs are left alone.
    pub fn request_stop(&self, id: &str) -> Result<(), RegistryError> {
        let (state, cancel) = self
            .jobs
            .get(id)
            .map(|entry| (Arc::clone(&entry.job), entry.cancel.clone()))
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if state.read().status.is_terminal() {
            debug!(target: "kbcrawl::registry", "Stop ignored for finished job {id}");
            return Ok(());
        }
        cancel.cancel();
        info!(target: "kbcrawl::registry", "Stop requested for job {id}");
        Ok(())
    }

    /// Cancel (if still running) and remove a job, returning its last state.
    pub fn delete(&self, id: &str) -> Result<CrawlJob, RegistryError> {
        let (_, entry) = self
            .jobs
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        entry.cancel.cancel();
        let job = entry.job.read().clone();
        info!(target: "kbcrawl::registry", "Deleted job {id}");
        Ok(job)
    }

    /// Apply `f` to a job under its write lock.
    pub fn update<F, R>(&self, id: &str, f: F) -> Result<R, RegistryError>
    where
        F: FnOnce(&mut CrawlJob) -> R,
    {
        let state = self.state(id)?;
        let mut job = state.write();
        Ok(f(&mut job))
    }

    pub fn cancellation_token(&self, id: &str) -> Result<CancellationToken, RegistryError> {
        self.jobs
            .get(id)
            .map(|entry| entry.cancel.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Remove terminal jobs older than `older_than`; returns how many were removed.
    ///
    /// Age is measured from `completed_at`, or `created_at` for paused jobs.
    pub fn sweep_terminal(&self, older_than: Duration) -> usize {
        let now = chrono::Utc::now();
        let initial_count = self.jobs.len();

        self.jobs.retain(|id, entry| {
            let job = entry.job.read();
            if !job.status.is_terminal() {
                return true;
            }
            let since = job.completed_at.unwrap_or(job.created_at);
            let age = now
                .signed_duration_since(since)
                .to_std()
                .unwrap_or(Duration::ZERO);
            let keep = age < older_than;
            if !keep {
                debug!(
                    target: "kbcrawl::registry",
                    "Removing old job {id}: {:?} (age: {age:?})",
                    job.status
                );
            }
            keep
        });

        let cleaned = initial_count.saturating_sub(self.jobs.len());
        if cleaned > 0 {
            debug!(target: "kbcrawl::registry", "Cleaned up {cleaned} jobs");
        }
        cleaned
    }

    /// Spawn the periodic retention sweep on a clone of this handle.
    pub fn start_cleanup_task(&self, every: Duration, retention: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                registry.sweep_terminal(retention);
            }
        })
    }
}
