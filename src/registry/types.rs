//! Job and ledger types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CrawlJobConfig;
use crate::screening::ScreeningResult;

/// Opaque job identifier (UUID v4 string)
pub type JobId = String;

/// Lifecycle of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    /// Stopped on request; never resumed
    Paused,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Paused | Self::Failed)
    }
}

/// What happened to one attempted page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOutcomeKind {
    Accepted,
    Rejected,
    FetchFailed,
    SkippedNonHtml,
}

/// Ledger entry for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub depth: u8,
    pub outcome: PageOutcomeKind,
    pub title: String,
    pub content_length: usize,
    /// 1-5 when accepted, 0 otherwise
    pub quality_score: u8,
    pub reason: Option<String>,
    pub flags: Vec<String>,
    pub diversity_score: Option<f32>,
    pub demographic_tags: Vec<String>,
    pub error: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl PageResult {
    fn empty(url: &str, depth: u8, outcome: PageOutcomeKind) -> Self {
        Self {
            url: url.to_string(),
            depth,
            outcome,
            title: String::new(),
            content_length: 0,
            quality_score: 0,
            reason: None,
            flags: Vec::new(),
            diversity_score: None,
            demographic_tags: Vec::new(),
            error: None,
            scraped_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn fetch_failed(url: &str, depth: u8, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(url, depth, PageOutcomeKind::FetchFailed)
        }
    }

    #[must_use]
    pub fn skipped_non_html(url: &str, depth: u8) -> Self {
        Self::empty(url, depth, PageOutcomeKind::SkippedNonHtml)
    }

    /// Entry for a page that reached screening.
    #[must_use]
    pub fn screened(
        url: &str,
        depth: u8,
        title: String,
        content_length: usize,
        screening: ScreeningResult,
    ) -> Self {
        let (outcome, quality_score) = if screening.approved {
            (PageOutcomeKind::Accepted, screening.quality_score)
        } else {
            (PageOutcomeKind::Rejected, 0)
        };
        Self {
            title,
            content_length,
            quality_score,
            reason: Some(screening.reason).filter(|r| !r.is_empty()),
            flags: screening.flags,
            diversity_score: screening.diversity_score,
            demographic_tags: screening.demographic_tags,
            ..Self::empty(url, depth, outcome)
        }
    }

    /// Accepted pages count as scraped; everything else as failed.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.outcome == PageOutcomeKind::Accepted
    }
}

/// One crawl request and everything it has produced so far
#[derive(Debug, Clone, Serialize)]
pub struct CrawlJob {
    pub id: JobId,
    pub config: CrawlJobConfig,
    pub status: JobStatus,
    pub urls_found: usize,
    pub urls_scraped: usize,
    pub urls_failed: usize,
    pub urls_pending: usize,
    pub current_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "scraped_urls")]
    pub results: Vec<PageResult>,
    pub error: Option<String>,
}

impl CrawlJob {
    /// A fresh PENDING job with only the seed known.
    #[must_use]
    pub fn new(id: JobId, config: CrawlJobConfig) -> Self {
        Self {
            id,
            config,
            status: JobStatus::Pending,
            urls_found: 1,
            urls_scraped: 0,
            urls_failed: 0,
            urls_pending: 1,
            current_url: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            results: Vec::new(),
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Append a ledger entry and bump the matching counter.
    pub fn record_page(&mut self, result: PageResult) {
        if result.is_accepted() {
            self.urls_scraped += 1;
        } else {
            self.urls_failed += 1;
        }
        self.results.push(result);
    }

    pub fn mark_completed(&mut self) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.current_url = None;
    }

    pub fn mark_paused(&mut self) {
        self.status = JobStatus::Paused;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    /// Number of ledger entries
    #[must_use]
    pub fn pages_processed(&self) -> usize {
        self.results.len()
    }
}
