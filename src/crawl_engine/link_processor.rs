//! Link processing and frontier management
//!
//! This module extracts outbound links from fetched pages, decides which of
//! them are eligible for a job, and owns the breadth-first frontier.

use log::{debug, trace};
use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::sync::LazyLock;
use url::Url;

use super::crawl_types::FrontierEntry;
use crate::utils::{host_of, normalize_url};

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

/// href prefixes that never point at a crawlable page
const IGNORED_HREF_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// A single include/exclude rule.
///
/// A pattern matches a URL when it is a case-insensitive substring of it or,
/// if the pattern is a valid regular expression, when that expression matches
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    raw: String,
    lowered: String,
    regex: Option<Regex>,
}

impl UrlPattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .ok();
        Self {
            raw: pattern.to_string(),
            lowered: pattern.to_lowercase(),
            regex,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        if url.to_lowercase().contains(&self.lowered) {
            return true;
        }
        self.regex.as_ref().is_some_and(|re| re.is_match(url))
    }
}

/// Compiled include/exclude rules for one job
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    include: Vec<UrlPattern>,
    exclude: Vec<UrlPattern>,
}

impl UrlFilter {
    /// Compile a filter; blank patterns are ignored.
    #[must_use]
    pub fn new<S: AsRef<str>>(exclude: &[S], include: &[S]) -> Self {
        let compile = |patterns: &[S]| {
            patterns
                .iter()
                .map(AsRef::as_ref)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(UrlPattern::new)
                .collect::<Vec<_>>()
        };
        Self {
            include: compile(include),
            exclude: compile(exclude),
        }
    }

    /// Exclude rules always win; a non-empty include list must match at least once.
    #[must_use]
    pub fn is_eligible(&self, url: &str) -> bool {
        if let Some(pattern) = self.exclude.iter().find(|p| p.matches(url)) {
            trace!(target: "kbcrawl::links", "{url} excluded by '{}'", pattern.as_str());
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(url))
    }

    #[must_use]
    pub fn include_patterns(&self) -> Vec<String> {
        self.include.iter().map(|p| p.raw.clone()).collect()
    }

    #[must_use]
    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude.iter().map(|p| p.raw.clone()).collect()
    }
}

/// Decide whether `url` may be crawled under the given rules.
///
/// Convenience wrapper that compiles the patterns on every call; the engine
/// uses a pre-compiled [`UrlFilter`] instead.
#[must_use]
pub fn is_eligible<S: AsRef<str>>(url: &str, exclude_patterns: &[S], include_patterns: &[S]) -> bool {
    UrlFilter::new(exclude_patterns, include_patterns).is_eligible(url)
}

/// Collect the canonical targets of every anchor in `html`.
///
/// Links are returned in order of first appearance without duplicates.
/// `javascript:`, `mailto:`, `tel:`, `data:`, empty and fragment-only hrefs are
/// dropped. With `same_domain_only`, only links on the base URL's host survive.
#[must_use]
pub fn extract_links(html: &str, base_url: &Url, same_domain_only: bool) -> Vec<String> {
    let document = Html::parse_document(html);
    let base_host = base_url.host_str().map(str::to_ascii_lowercase);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let lowered = href.to_ascii_lowercase();
        if IGNORED_HREF_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            continue;
        }

        let normalized = match normalize_url(href, Some(base_url)) {
            Ok(url) => url,
            Err(e) => {
                trace!(target: "kbcrawl::links", "Skipping href '{href}': {e}");
                continue;
            }
        };

        if same_domain_only && host_of(&normalized) != base_host {
            continue;
        }

        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    links
}

/// Breadth-first frontier for a single job.
///
/// `queued` holds every URL ever enqueued (seed included) so a URL is counted
/// and enqueued once; `visited` holds URLs that have been dequeued for
/// processing.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    #[must_use]
    pub fn with_seed(seed: String) -> Self {
        let mut frontier = Self::default();
        frontier.queued.insert(seed.clone());
        frontier.queue.push_back(FrontierEntry::new(seed, 0));
        frontier
    }

    /// Remove the earliest-inserted entry.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Mark a URL as visited; returns `false` if it already was.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Enqueue eligible, never-seen links at `depth`; returns how many were added.
    pub fn enqueue_links(&mut self, links: Vec<String>, depth: u8, filter: &UrlFilter) -> usize {
        let mut added = 0;
        for link in links {
            if self.visited.contains(&link) || self.queued.contains(&link) {
                continue;
            }
            if !filter.is_eligible(&link) {
                continue;
            }
            self.queued.insert(link.clone());
            self.queue.push_back(FrontierEntry::new(link, depth));
            added += 1;
        }
        debug!(
            target: "kbcrawl::links",
            "Enqueued {added} new links at depth {depth}, {} pending",
            self.queue.len()
        );
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_case_insensitive() {
        let pattern = UrlPattern::new("LOGIN");
        assert!(pattern.matches("https://example.com/login/page"));
    }

    #[test]
    fn regex_pattern_matches() {
        let filter = UrlFilter::new(&[r"\.pdf$"], &[] as &[&str]);
        assert!(!filter.is_eligible("https://example.com/report.PDF"));
        assert!(filter.is_eligible("https://example.com/report.html"));
    }

    #[test]
    fn invalid_regex_still_matches_as_substring() {
        let filter = UrlFilter::new(&["page?("], &[] as &[&str]);
        assert!(!filter.is_eligible("https://example.com/page?(x)"));
        assert!(filter.is_eligible("https://example.com/other"));
    }

    #[test]
    fn frontier_is_fifo_and_dedups() {
        let mut frontier = Frontier::with_seed("https://example.com".into());
        let filter = UrlFilter::default();
        let added = frontier.enqueue_links(
            vec![
                "https://example.com/a".into(),
                "https://example.com/b".into(),
                "https://example.com".into(),
            ],
            1,
            &filter,
        );
        assert_eq!(added, 2);
        assert_eq!(frontier.pop().unwrap().url, "https://example.com");
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/a");

        let again = frontier.enqueue_links(vec!["https://example.com/a".into()], 2, &filter);
        assert_eq!(again, 0);
        assert_eq!(frontier.pending(), 1);
    }
}
