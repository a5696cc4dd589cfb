//! Per-page content pipeline
//!
//! fetch -> content-type check -> extract -> screen. Each page yields exactly
//! one [`PageResult`]; nothing here fails the job.

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::content_validator::validate_content_type;
use crate::config::EngineSettings;
use crate::fetch::{FetchError, FetchedPage, PageFetcher};
use crate::page_extractor::extract_page;
use crate::registry::PageResult;
use crate::screening::{ContentClassifier, screen_or_default};
use crate::utils::safe_truncate_chars;

/// Why a page could not be obtained as HTML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlFetchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Not an HTML page ({content_type})")]
    NotHtml { content_type: String },
}

/// Result of processing one page
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub result: PageResult,
    /// The fetched page when it was HTML, for link expansion
    pub page: Option<FetchedPage>,
}

/// Shared, stateless page pipeline
#[derive(Clone)]
pub struct ContentPipeline {
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn ContentClassifier>,
    settings: Arc<EngineSettings>,
}

impl ContentPipeline {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn ContentClassifier>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn ContentClassifier {
        self.classifier.as_ref()
    }

    /// Fetch `url` and require an HTML content type.
    pub async fn fetch_html(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<FetchedPage, HtmlFetchError> {
        let page = self.fetcher.fetch(url, timeout).await?;

        let validation = validate_content_type(
            page.content_type.as_deref(),
            url,
            self.settings.html_content_types.as_slice(),
        );
        if !validation.is_valid {
            return Err(HtmlFetchError::NotHtml {
                content_type: page.content_type.unwrap_or_default(),
            });
        }
        Ok(page)
    }

    /// Run the crawl pipeline for one frontier entry.
    pub async fn process(&self, url: &str, depth: u8) -> PageOutcome {
        let page = match self.fetch_html(url, self.settings.crawl_fetch_timeout).await {
            Ok(page) => page,
            Err(HtmlFetchError::NotHtml { content_type }) => {
                debug!(target: "kbcrawl::pipeline", "Skipping non-HTML {url} ({content_type})");
                return PageOutcome {
                    result: PageResult::skipped_non_html(url, depth),
                    page: None,
                };
            }
            Err(HtmlFetchError::Fetch(e)) => {
                warn!(target: "kbcrawl::pipeline", "Fetch failed for {url}: {e}");
                return PageOutcome {
                    result: PageResult::fetch_failed(url, depth, e.to_string()),
                    page: None,
                };
            }
        };

        let extracted = extract_page(&page.body, url);
        let excerpt = safe_truncate_chars(&extracted.text, self.settings.screening_char_budget);
        let screening =
            screen_or_default(self.classifier.as_ref(), &extracted.title, excerpt, url).await;

        debug!(
            target: "kbcrawl::pipeline",
            "{url}: approved={} quality={}",
            screening.approved,
            screening.quality_score
        );

        let content_length = extracted.content_length();
        PageOutcome {
            result: PageResult::screened(url, depth, extracted.title, content_length, screening),
            page: Some(page),
        }
    }
}
