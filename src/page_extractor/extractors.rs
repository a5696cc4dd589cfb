//! Title and plain-text extraction
//!
//! Works on static HTML with `scraper`; no script execution.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::schema::ExtractedPage;
use crate::utils::collapse_whitespace;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});

static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid")
});

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Elements whose text never counts as page content
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Document title, else the first `<h1>`, else `fallback_url`.
#[must_use]
pub fn extract_title(document: &Html, fallback_url: &str) -> String {
    let first_text = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    };

    first_text(&TITLE_SELECTOR)
        .or_else(|| first_text(&H1_SELECTOR))
        .unwrap_or_else(|| fallback_url.to_string())
}

/// Whitespace-collapsed visible text of the document body.
#[must_use]
pub fn to_plain_text(html: &str) -> String {
    let document = Html::parse_document(html);
    plain_text_of(&document)
}

/// Title and plain text in one parse.
#[must_use]
pub fn extract_page(html: &str, url: &str) -> ExtractedPage {
    let document = Html::parse_document(html);
    ExtractedPage {
        title: extract_title(&document, url),
        text: plain_text_of(&document),
    }
}

fn plain_text_of(document: &Html) -> String {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());
    collapse_whitespace(&text_excluding(root, NON_TEXT_ELEMENTS).join(" "))
}

/// Trimmed text nodes under `element`, skipping any inside `excluded` tags.
pub(crate) fn text_excluding<'a>(element: ElementRef<'a>, excluded: &[&str]) -> Vec<&'a str> {
    element
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| excluded.contains(&el.name()))
            })
        })
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .collect()
}
