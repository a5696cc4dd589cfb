//! Test utilities shared by the kbcrawl integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use kbcrawl::config::EngineSettings;
use kbcrawl::fetch::{FetchError, FetchedPage, PageFetcher};
use kbcrawl::registry::CrawlJob;
use kbcrawl::screening::{ContentClassifier, ScreeningError, ScreeningResult, TagSuggestions};
use kbcrawl::service::CrawlService;

/// Creates a test HTML document with specified content
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// A page whose body is a paragraph followed by anchors to `links`
pub fn linking_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect::<Vec<_>>()
        .join("\n    ");
    create_test_html(
        title,
        &format!("<p>Content of the page titled {title}.</p>\n    {anchors}"),
    )
}

/// Engine settings without request pacing
pub fn fast_settings() -> EngineSettings {
    EngineSettings::default().with_request_interval(Duration::ZERO)
}

/// Blocks a fetch until the test releases it
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// In-memory fetcher serving scripted responses
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<FetchedPage, FetchError>>,
    gates: HashMap<String, Gate>,
    panics: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(
            url.to_string(),
            Ok(FetchedPage {
                final_url: url.to_string(),
                status: 200,
                content_type: Some("text/html; charset=utf-8".into()),
                body: body.into(),
            }),
        );
        self
    }

    pub fn with_content_type(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Ok(FetchedPage {
                final_url: url.to_string(),
                status: 200,
                content_type: Some(content_type.into()),
                body: body.into(),
            }),
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            url.to_string(),
            Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            }),
        );
        self
    }

    /// Hold fetches of `url` until the returned gate is released.
    pub fn gated(mut self, url: &str) -> (Self, Gate) {
        let gate = Gate::default();
        self.gates.insert(url.to_string(), gate.clone());
        (self, gate)
    }

    /// Panic inside the fetch of `url`
    pub fn panicking(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    /// URLs in the order they were fetched
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage, FetchError> {
        self.requests.lock().push(url.to_string());

        if let Some(gate) = self.gates.get(url) {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if self.panics.contains(url) {
            panic!("scripted fetch of {url} blew up");
        }

        self.pages.get(url).cloned().unwrap_or_else(|| {
            Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        })
    }
}

/// Classifier with per-URL verdicts; approves with quality 4 by default
#[derive(Default)]
pub struct ScriptedClassifier {
    verdicts: HashMap<String, ScreeningResult>,
    unavailable: bool,
    tags: TagSuggestions,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the service were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn reject(mut self, url: &str, reason: &str) -> Self {
        self.verdicts.insert(
            url.to_string(),
            ScreeningResult {
                approved: false,
                quality_score: 1,
                reason: reason.to_string(),
                flags: vec!["off_topic".into()],
                diversity_score: None,
                demographic_tags: Vec::new(),
            },
        );
        self
    }

    pub fn with_tags(mut self, category: &str, tags: &[&str]) -> Self {
        let tags: Vec<String> = tags.iter().map(|t| (*t).to_string()).collect();
        self.tags.merge(category, &tags);
        self
    }
}

pub fn approved(quality_score: u8) -> ScreeningResult {
    ScreeningResult {
        approved: true,
        quality_score,
        reason: "relevant".into(),
        flags: Vec::new(),
        diversity_score: Some(0.5),
        demographic_tags: vec!["adults".into()],
    }
}

#[async_trait]
impl ContentClassifier for ScriptedClassifier {
    async fn screen(
        &self,
        _title: &str,
        _text: &str,
        url: &str,
    ) -> Result<ScreeningResult, ScreeningError> {
        if self.unavailable {
            return Err(ScreeningError::Network("connection refused".into()));
        }
        Ok(self.verdicts.get(url).cloned().unwrap_or_else(|| approved(4)))
    }

    async fn suggest_tags(
        &self,
        _title: &str,
        _text: &str,
        _url: &str,
    ) -> Result<TagSuggestions, ScreeningError> {
        if self.unavailable {
            return Err(ScreeningError::Network("connection refused".into()));
        }
        Ok(self.tags.clone())
    }
}

pub fn service_with(fetcher: ScriptedFetcher, classifier: ScriptedClassifier) -> CrawlService {
    CrawlService::new(Arc::new(fetcher), Arc::new(classifier), fast_settings())
}

/// Poll until the job reaches a terminal state.
pub async fn wait_for_terminal(service: &CrawlService, id: &str) -> CrawlJob {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let job = service.get_job(id).expect("job should exist");
            if job.status.is_terminal() {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}
