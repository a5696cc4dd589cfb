//! Crawl orchestration
//!
//! Drives one job through `PENDING -> RUNNING -> {COMPLETED | PAUSED | FAILED}`:
//! breadth-first over the frontier, one page at a time, paced per job, with
//! every result published into the job's registry entry as it happens.

use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::crawl_types::{CrawlError, CrawlResult, FrontierEntry};
use super::link_processor::{Frontier, extract_links};
use super::page_processor::ContentPipeline;
use super::rate_limiter::RequestPacer;
use crate::config::CrawlJobConfig;
use crate::fetch::FetchedPage;
use crate::registry::{JobRegistry, JobStatus};
use crate::utils::normalize_url;

/// Single-worker crawl engine for one job at a time
#[derive(Clone)]
pub struct CrawlEngine {
    registry: JobRegistry,
    pipeline: ContentPipeline,
}

impl CrawlEngine {
    #[must_use]
    pub fn new(registry: JobRegistry, pipeline: ContentPipeline) -> Self {
        Self { registry, pipeline }
    }

    /// Run the PENDING job `job_id` to a terminal state and return that state.
    ///
    /// Per-page failures are recorded in the ledger. Engine faults return
    /// `Err` after marking the job FAILED if it still exists. A job that is
    /// not PENDING is left untouched and yields [`CrawlError::NotPending`].
    pub async fn run(&self, job_id: &str, cancel: CancellationToken) -> CrawlResult<JobStatus> {
        let engine = self.clone();
        let id = job_id.to_string();
        let outcome = tokio::spawn(async move { engine.drive(&id, &cancel).await })
            .await
            .unwrap_or_else(|join_error| Err(CrawlError::EngineFault(join_error.to_string())));

        match outcome {
            Ok(status) => Ok(status),
            Err(e @ CrawlError::NotPending { .. }) => {
                warn!(target: "kbcrawl::engine", "Not running job {job_id}: {e}");
                Err(e)
            }
            Err(e) => {
                error!(target: "kbcrawl::engine", "Job {job_id} failed: {e}");
                let message = e.to_string();
                if self
                    .registry
                    .update(job_id, |job| job.mark_failed(message))
                    .is_err()
                {
                    debug!(target: "kbcrawl::engine", "Job {job_id} no longer registered");
                }
                Err(e)
            }
        }
    }

    async fn drive(&self, job_id: &str, cancel: &CancellationToken) -> CrawlResult<JobStatus> {
        let config: CrawlJobConfig = self
            .registry
            .update(job_id, |job| {
                if job.status != JobStatus::Pending {
                    return Err(job.status);
                }
                job.mark_running();
                Ok(job.config.clone())
            })?
            .map_err(|status| CrawlError::NotPending { status })?;

        let seed = normalize_url(config.seed_url(), None)
            .map_err(|e| CrawlError::InvalidSeed(e.to_string()))?;

        info!(
            target: "kbcrawl::engine",
            "Job {job_id} running: seed={seed} max_depth={} max_urls={}",
            config.max_depth(),
            config.max_urls()
        );

        let mut frontier = Frontier::with_seed(seed);
        let mut pacer = RequestPacer::new(self.pipeline.settings().request_interval);

        while !frontier.is_empty() && frontier.visited_count() < config.max_urls() {
            if cancel.is_cancelled() {
                let pending = frontier.pending();
                self.registry.update(job_id, |job| {
                    job.urls_pending = pending;
                    job.mark_paused();
                })?;
                info!(
                    target: "kbcrawl::engine",
                    "Job {job_id} paused after {} pages",
                    frontier.visited_count()
                );
                return Ok(JobStatus::Paused);
            }

            let Some(FrontierEntry { url, depth }) = frontier.pop() else {
                break;
            };
            if !frontier.mark_visited(&url) {
                continue;
            }

            let pending = frontier.pending();
            self.registry.update(job_id, |job| {
                job.current_url = Some(url.clone());
                job.urls_pending = pending;
            })?;

            pacer.wait().await;
            let outcome = self.pipeline.process(&url, depth).await;

            let mut added = 0;
            if depth < config.max_depth()
                && let Some(page) = &outcome.page
            {
                let links = discover(page, &url, config.same_domain_only());
                added = frontier.enqueue_links(links, depth + 1, config.filter());
            }

            let pending = frontier.pending();
            let result = outcome.result;
            self.registry.update(job_id, move |job| {
                job.record_page(result);
                job.urls_found += added;
                job.urls_pending = pending;
            })?;
        }

        let pending = frontier.pending();
        self.registry.update(job_id, |job| {
            job.urls_pending = pending;
            job.mark_completed();
        })?;
        info!(
            target: "kbcrawl::engine",
            "Job {job_id} completed: {} pages processed, {pending} left in frontier",
            frontier.visited_count()
        );
        Ok(JobStatus::Completed)
    }
}

/// Outbound links of a fetched page, resolved against where it was served from.
fn discover(page: &FetchedPage, requested_url: &str, same_domain_only: bool) -> Vec<String> {
    let base = Url::parse(&page.final_url).or_else(|_| Url::parse(requested_url));
    match base {
        Ok(base) => extract_links(&page.body, &base, same_domain_only),
        Err(e) => {
            warn!(target: "kbcrawl::links", "Cannot resolve links on {requested_url}: {e}");
            Vec::new()
        }
    }
}
