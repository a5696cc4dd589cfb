//! Classification collaborator contract

use async_trait::async_trait;
use log::warn;

use super::types::{ScreeningError, ScreeningResult, TagSuggestions};

/// External quality/relevance screening and tag extraction.
///
/// Implementations receive text already truncated to the caller's budget and
/// must return sanitized results.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    async fn screen(
        &self,
        title: &str,
        text: &str,
        url: &str,
    ) -> Result<ScreeningResult, ScreeningError>;

    async fn suggest_tags(
        &self,
        title: &str,
        text: &str,
        url: &str,
    ) -> Result<TagSuggestions, ScreeningError>;
}

/// Approves everything with the neutral score; used when no classifier is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralClassifier;

#[async_trait]
impl ContentClassifier for NeutralClassifier {
    async fn screen(
        &self,
        _title: &str,
        _text: &str,
        _url: &str,
    ) -> Result<ScreeningResult, ScreeningError> {
        Ok(ScreeningResult::neutral_default())
    }

    async fn suggest_tags(
        &self,
        _title: &str,
        _text: &str,
        _url: &str,
    ) -> Result<TagSuggestions, ScreeningError> {
        Ok(TagSuggestions::empty())
    }
}

/// Screen a page, absorbing any classifier failure into the neutral default.
pub async fn screen_or_default(
    classifier: &dyn ContentClassifier,
    title: &str,
    text: &str,
    url: &str,
) -> ScreeningResult {
    match classifier.screen(title, text, url).await {
        Ok(result) => result.sanitize(),
        Err(e) => {
            warn!(target: "kbcrawl::screening", "Screening failed for {url}, using default: {e}");
            ScreeningResult::neutral_default()
        }
    }
}

/// Suggest tags, absorbing any classifier failure into empty suggestions.
pub async fn tags_or_empty(
    classifier: &dyn ContentClassifier,
    title: &str,
    text: &str,
    url: &str,
) -> TagSuggestions {
    match classifier.suggest_tags(title, text, url).await {
        Ok(tags) => tags.sanitize(),
        Err(e) => {
            warn!(target: "kbcrawl::screening", "Tag suggestion failed for {url}: {e}");
            TagSuggestions::empty()
        }
    }
}
