//! Readable markdown extraction
//!
//! Produces a compact markdown rendition of a page's main content:
//! 1. Non-content elements (scripts, navigation, footers, forms, ...) are ignored
//! 2. The content region is `<main>`, else `<article>`, else `[role=main]`, else `<body>`
//! 3. Headings, paragraphs and list items are emitted in document order
//! 4. Empty, very short and repeated texts are dropped
//! 5. If nothing survives, the region's text lines are used instead
//!
//! Headings and paragraphs are separated by one blank line; consecutive list
//! items are not.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::extractors::text_excluding;
use crate::utils::collapse_whitespace;

/// Elements never treated as content
const REMOVED_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "form", "noscript", "iframe",
    "button", "svg",
];

/// Blocks shorter than this many characters are dropped
const MIN_BLOCK_CHARS: usize = 15;

/// Fallback lines must be longer than this many characters
const MIN_FALLBACK_LINE_CHARS: usize = 20;

static CONTENT_REGION_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["main", "article", "[role='main']", "body"]
        .iter()
        .map(|s| {
            Selector::parse(s).unwrap_or_else(|_| panic!("BUG: hardcoded CSS selector '{s}' is invalid"))
        })
        .collect()
});

static BLOCK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li")
        .expect("BUG: hardcoded block selector is invalid")
});

/// Convert an HTML document into readable markdown.
#[must_use]
pub fn to_readable_markdown(html: &str) -> String {
    let document = Html::parse_document(html);
    let region = content_region(&document);

    let mut seen: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for element in region.select(&BLOCK_SELECTOR) {
        if is_removed(element) {
            continue;
        }

        let text = collapse_whitespace(&text_excluding(element, REMOVED_ELEMENTS).join(" "));
        if text.chars().count() < MIN_BLOCK_CHARS || seen.contains(&text) {
            continue;
        }
        seen.insert(text.clone());

        let line = match heading_level(element.value().name()) {
            Some(level) => format!("\n{} {text}\n", "#".repeat(level)),
            None if element.value().name() == "li" => format!("- {text}"),
            None => format!("\n{text}\n"),
        };
        lines.push(line);
    }

    if lines.is_empty() {
        for piece in text_excluding(region, REMOVED_ELEMENTS) {
            for line in piece.lines().map(str::trim) {
                if line.chars().count() > MIN_FALLBACK_LINE_CHARS && seen.insert(line.to_string()) {
                    lines.push(line.to_string());
                }
            }
        }
    }

    collapse_blank_lines(&lines.join("\n"))
}

/// At most one blank line between blocks, none at either end.
fn collapse_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && out.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        out.push(if blank { "" } else { line });
    }
    while out.last().is_some_and(|last| last.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn content_region(document: &Html) -> ElementRef<'_> {
    CONTENT_REGION_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).find(|el| !is_removed(*el)))
        .unwrap_or_else(|| document.root_element())
}

fn is_removed(element: ElementRef<'_>) -> bool {
    REMOVED_ELEMENTS.contains(&element.value().name())
        || element.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| REMOVED_ELEMENTS.contains(&el.name()))
        })
}

fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
