//! Content validation for fetched responses
//!
//! Decides whether a successfully fetched response is crawlable HTML based on
//! its declared `Content-Type`. A non-HTML response is not an error; the
//! pipeline records it as skipped.

use log::debug;

/// Result of content validation
#[derive(Debug, Clone, PartialEq)]
pub struct ContentValidationResult {
    /// Whether the content is crawlable HTML
    pub is_valid: bool,
    /// Reason for validation failure (if any)
    pub reason: Option<String>,
}

impl ContentValidationResult {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    #[must_use]
    pub fn invalid(reason: String) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason),
        }
    }
}

/// Validate a response by its declared content type.
///
/// The media type (before any `;` parameters) is compared case-insensitively
/// against `allowed`. A missing header is treated as HTML.
#[must_use]
pub fn validate_content_type<S: AsRef<str>>(
    content_type: Option<&str>,
    url: &str,
    allowed: &[S],
) -> ContentValidationResult {
    let Some(content_type) = content_type else {
        debug!(target: "kbcrawl::pipeline", "No content type for {url}, assuming HTML");
        return ContentValidationResult::valid();
    };

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if allowed
        .iter()
        .any(|a| a.as_ref().eq_ignore_ascii_case(&media_type))
    {
        ContentValidationResult::valid()
    } else {
        debug!(target: "kbcrawl::pipeline", "Skipping {url}: content type {media_type}");
        ContentValidationResult::invalid(format!("Non-HTML content type: {media_type}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::HTML_CONTENT_TYPES;

    #[test]
    fn html_with_charset_accepts() {
        let result = validate_content_type(
            Some("text/html; charset=utf-8"),
            "https://example.com",
            HTML_CONTENT_TYPES,
        );
        assert!(result.is_valid);
    }

    #[test]
    fn xhtml_accepts() {
        let result = validate_content_type(
            Some("Application/XHTML+XML"),
            "https://example.com",
            HTML_CONTENT_TYPES,
        );
        assert!(result.is_valid);
    }

    #[test]
    fn pdf_rejects() {
        let result = validate_content_type(
            Some("application/pdf"),
            "https://example.com/a.pdf",
            HTML_CONTENT_TYPES,
        );
        assert!(!result.is_valid);
        assert!(result.reason.unwrap().contains("application/pdf"));
    }

    #[test]
    fn missing_content_type_assumes_html() {
        let result = validate_content_type(None, "https://example.com", HTML_CONTENT_TYPES);
        assert!(result.is_valid);
    }
}
