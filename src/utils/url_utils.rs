//! URL canonicalization utilities.
//!
//! The canonical form produced here is the dedup key for a crawl job: two
//! URLs that differ only by fragment or trailing slash map to the same string.

use thiserror::Error;
use url::Url;

/// Reasons a URL cannot be canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Invalid URL '{url}': {reason}")]
    Invalid { url: String, reason: String },

    #[error("Unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Canonicalize `raw`, resolving it against `base` when it is relative.
///
/// - fragment is stripped
/// - query string is preserved
/// - trailing path separators are removed (`/docs/` and `/docs` are equal)
/// - the root path is rendered as the bare origin (`https://example.com`)
/// - only `http` and `https` are accepted
///
/// The function is idempotent: `normalize_url(normalize_url(u)) == normalize_url(u)`.
///
/// # Examples
///
/// ```
/// use kbcrawl::utils::normalize_url;
///
/// let canonical = normalize_url("https://example.com/page/#section", None).unwrap();
/// assert_eq!(canonical, "https://example.com/page");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    let parsed = match base {
        Some(base) => base.join(trimmed),
        None => Url::parse(trimmed),
    }
    .map_err(|e| UrlError::Invalid {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    canonicalize(parsed)
}

/// Canonicalize an already parsed URL. See [`normalize_url`].
pub fn canonicalize(mut url: Url) -> Result<String, UrlError> {
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(UrlError::UnsupportedScheme {
                url: url.to_string(),
                scheme: other.to_string(),
            });
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    url.set_fragment(None);
    if url.query() == Some("") {
        url.set_query(None);
    }

    let trimmed_path = url.path().trim_end_matches('/').to_string();
    if trimmed_path.is_empty() {
        url.set_path("/");
    } else if trimmed_path.len() != url.path().len() {
        url.set_path(&trimmed_path);
    }

    let mut canonical = url.to_string();
    if url.path() == "/" && url.query().is_none() && canonical.ends_with('/') {
        canonical.pop();
    }
    Ok(canonical)
}

/// Lowercased host of a URL string, if it parses.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fragment_and_trailing_slash() {
        let a = normalize_url("https://example.com/docs/#intro", None).unwrap();
        let b = normalize_url("https://example.com/docs", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "https://example.com/docs");
    }

    #[test]
    fn preserves_query() {
        let url = normalize_url("https://example.com/search/?q=rust#top", None).unwrap();
        assert_eq!(url, "https://example.com/search?q=rust");
    }

    #[test]
    fn root_is_bare_origin() {
        assert_eq!(
            normalize_url("https://example.com/", None).unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize_url("https://example.com", None).unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn resolves_relative_against_base() {
        let base = Url::parse("https://example.com/blog/post-1").unwrap();
        assert_eq!(
            normalize_url("../about/", Some(&base)).unwrap(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize_url("post-2#comments", Some(&base)).unwrap(),
            "https://example.com/blog/post-2"
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            normalize_url("ftp://example.com/file", None),
            Err(UrlError::UnsupportedScheme { .. })
        ));
        assert!(normalize_url("mailto:someone@example.com", None).is_err());
        assert!(normalize_url("not a url", None).is_err());
    }

    #[test]
    fn empty_query_is_dropped() {
        assert_eq!(
            normalize_url("https://e.com/?", None).unwrap(),
            "https://e.com"
        );
        assert_eq!(
            normalize_url("https://e.com/docs/?#x", None).unwrap(),
            "https://e.com/docs"
        );
        assert_eq!(
            normalize_url("https://e.com/?q=", None).unwrap(),
            "https://e.com/?q="
        );
    }
}
