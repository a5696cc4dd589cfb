//! Job submission and query surface

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::types::{CrawlRequest, ServiceError};
use crate::config::EngineSettings;
use crate::crawl_engine::{ContentPipeline, CrawlEngine};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::registry::{CrawlJob, JobId, JobRegistry};
use crate::screening::{ContentClassifier, LlmClassifier, NeutralClassifier};
use crate::utils::{DEFAULT_JOB_RETENTION, JOB_SWEEP_INTERVAL, SERVICE_NAME};

/// Liveness report
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

/// Owns the registry and the shared pipeline; one engine task per job.
#[derive(Clone)]
pub struct CrawlService {
    registry: JobRegistry,
    pipeline: ContentPipeline,
}

impl CrawlService {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn ContentClassifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            registry: JobRegistry::new(),
            pipeline: ContentPipeline::new(fetcher, classifier, Arc::new(settings)),
        }
    }

    /// Production wiring: HTTP fetcher plus the LLM classifier when an API
    /// key is configured, the neutral classifier otherwise.
    pub fn from_env(settings: EngineSettings) -> Result<Self, ServiceError> {
        let fetcher = HttpFetcher::new(&settings.user_agent)?;
        let classifier: Arc<dyn ContentClassifier> = match LlmClassifier::from_env() {
            Ok(classifier) => {
                info!(
                    target: "kbcrawl::screening",
                    "Screening with model {}",
                    classifier.settings().model
                );
                Arc::new(classifier)
            }
            Err(e) => {
                warn!(target: "kbcrawl::screening", "{e}; all pages will be approved");
                Arc::new(NeutralClassifier)
            }
        };
        Ok(Self::new(Arc::new(fetcher), classifier, settings))
    }

    #[must_use]
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        self.pipeline.settings()
    }

    pub(crate) fn pipeline(&self) -> &ContentPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            service: SERVICE_NAME,
        }
    }

    /// Periodically drop finished jobs older than [`DEFAULT_JOB_RETENTION`].
    pub fn start_retention_sweep(&self) -> JoinHandle<()> {
        self.start_retention_sweep_with(JOB_SWEEP_INTERVAL, DEFAULT_JOB_RETENTION)
    }

    pub fn start_retention_sweep_with(&self, every: Duration, retention: Duration) -> JoinHandle<()> {
        self.registry.start_cleanup_task(every, retention)
    }

    fn engine(&self) -> CrawlEngine {
        CrawlEngine::new(self.registry.clone(), self.pipeline.clone())
    }

    /// Validate and register a job, then run it on a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_crawl(&self, request: CrawlRequest) -> Result<JobId, ServiceError> {
        let config = request.into_config()?;
        let job_id = self.registry.create(config);
        let cancel = self.registry.cancellation_token(&job_id)?;

        let engine = self.engine();
        let task_id = job_id.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.run(&task_id, cancel).await {
                debug!(target: "kbcrawl::engine", "Engine task for {task_id} ended with {e}");
            }
        });

        info!(target: "kbcrawl::registry", "Started job {job_id}");
        Ok(job_id)
    }

    /// Validate, register and run a job on the current task; returns the final snapshot.
    pub async fn run_crawl(&self, request: CrawlRequest) -> Result<CrawlJob, ServiceError> {
        let config = request.into_config()?;
        let job_id = self.registry.create(config);
        let cancel = self.registry.cancellation_token(&job_id)?;

        if let Err(e) = self.engine().run(&job_id, cancel).await {
            debug!(target: "kbcrawl::engine", "Job {job_id} ended with {e}");
        }
        Ok(self.registry.get(&job_id)?)
    }

    pub fn get_job(&self, id: &str) -> Result<CrawlJob, ServiceError> {
        Ok(self.registry.get(id)?)
    }

    #[must_use]
    pub fn list_jobs(&self) -> Vec<CrawlJob> {
        self.registry.list()
    }

    pub fn stop_job(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.registry.request_stop(id)?)
    }

    pub fn delete_job(&self, id: &str) -> Result<CrawlJob, ServiceError> {
        Ok(self.registry.delete(id)?)
    }
}
