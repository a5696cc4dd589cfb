//! Standalone single-page operations
//!
//! Unlike the crawl pipeline these have no ledger to absorb failures, so a
//! failed fetch or a non-HTML response is returned as an error.

use log::info;
use url::Url;

use super::crawl_service::CrawlService;
use super::types::{DiscoveredLinks, ScrapeMetadata, ScrapeRequest, ScrapeResponse, ServiceError};
use crate::chunking::{ChunkingOptions, chunk_markdown};
use crate::crawl_engine::{HtmlFetchError, extract_links};
use crate::fetch::FetchedPage;
use crate::page_extractor::{extract_page, to_readable_markdown};
use crate::screening::{TagSuggestions, screen_or_default, tags_or_empty};
use crate::utils::{normalize_url, safe_truncate_chars};

/// Category holding the caller's own tags in a scrape response
pub const HINT_TAG_CATEGORY: &str = "hint";

/// Canonicalize user input, treating a scheme-less URL as `https://`.
fn canonical_input(raw: &str) -> Result<String, ServiceError> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    Ok(normalize_url(&with_scheme, None)?)
}

impl CrawlService {
    async fn fetch_page(
        &self,
        url: &str,
        timeout: std::time::Duration,
    ) -> Result<FetchedPage, ServiceError> {
        self.pipeline()
            .fetch_html(url, timeout)
            .await
            .map_err(|e| match e {
                HtmlFetchError::Fetch(e) => ServiceError::Fetch(e),
                HtmlFetchError::NotHtml { content_type } => ServiceError::NotHtml {
                    url: url.to_string(),
                    content_type,
                },
            })
    }

    /// Fetch one page and return its readable markdown, screening, tags and passages.
    pub async fn scrape(&self, request: ScrapeRequest) -> Result<ScrapeResponse, ServiceError> {
        let url = canonical_input(&request.url)?;
        let settings = self.settings();
        let page = self.fetch_page(&url, settings.scrape_fetch_timeout).await?;

        let extracted = extract_page(&page.body, &url);
        let full_markdown = to_readable_markdown(&page.body);
        let content_length = full_markdown.chars().count();

        let classifier = self.pipeline().classifier();
        let screening = screen_or_default(
            classifier,
            &extracted.title,
            safe_truncate_chars(&extracted.text, settings.screening_char_budget),
            &url,
        )
        .await;

        let mut suggested_tags = if request.suggest_tags {
            tags_or_empty(
                classifier,
                &extracted.title,
                safe_truncate_chars(&extracted.text, settings.tagging_char_budget),
                &url,
            )
            .await
        } else {
            TagSuggestions::empty()
        };
        if !request.tags.is_empty() {
            suggested_tags.merge(HINT_TAG_CATEGORY, &request.tags);
        }

        let chunks = if request.chunk {
            chunk_markdown(&full_markdown, ChunkingOptions::from(settings))
        } else {
            Vec::new()
        };

        info!(
            target: "kbcrawl::pipeline",
            "Scraped {url}: {content_length} chars, {} chunks",
            chunks.len()
        );

        Ok(ScrapeResponse {
            title: extracted.title,
            markdown: safe_truncate_chars(&full_markdown, settings.max_markdown_chars).to_string(),
            suggested_tags,
            screening,
            chunks,
            metadata: ScrapeMetadata {
                content_length,
                status_code: page.status,
                raw_html_size: page.body.len(),
            },
            url,
        })
    }

    /// Fetch one page and list the links a crawl from it would consider.
    pub async fn discover_links(
        &self,
        url: &str,
        same_domain_only: bool,
    ) -> Result<DiscoveredLinks, ServiceError> {
        let url = canonical_input(url)?;
        let page = self
            .fetch_page(&url, self.settings().crawl_fetch_timeout)
            .await?;

        let base = Url::parse(&page.final_url).or_else(|_| Url::parse(&url)).map_err(|e| {
            ServiceError::InvalidUrl(crate::utils::UrlError::Invalid {
                url: url.clone(),
                reason: e.to_string(),
            })
        })?;
        let links = extract_links(&page.body, &base, same_domain_only);

        Ok(DiscoveredLinks {
            total: links.len(),
            links,
            url,
        })
    }
}
