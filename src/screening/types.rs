//! Screening and tagging result types
//!
//! Classifier output is untrusted. Every field has a serde default, and
//! `sanitize()` is applied right after parsing so downstream code can rely on
//! the documented ranges.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::utils::{NEUTRAL_QUALITY_SCORE, TAG_CATEGORIES, safe_truncate_chars};

pub const MAX_REASON_CHARS: usize = 200;
pub const MAX_LIST_ITEMS: usize = 10;
pub const MAX_ITEM_CHARS: usize = 64;

/// Reason recorded when screening could not be performed
pub const SCREENING_UNAVAILABLE: &str = "screening unavailable";

/// Failures talking to or understanding the classification service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreeningError {
    /// Missing API key or an unusable client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response or an empty completion
    #[error("API error: {0}")]
    Api(String),

    /// The completion was not the JSON we asked for
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Quality/relevance verdict for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    #[serde(default = "default_approved")]
    pub approved: bool,

    /// 1 (poor) to 5 (excellent)
    #[serde(default = "default_quality", deserialize_with = "lenient_score")]
    pub quality_score: u8,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub flags: Vec<String>,

    /// 0.0 to 1.0, when the classifier reports one
    #[serde(default)]
    pub diversity_score: Option<f32>,

    #[serde(default)]
    pub demographic_tags: Vec<String>,
}

fn default_approved() -> bool {
    true
}

fn default_quality() -> u8 {
    NEUTRAL_QUALITY_SCORE
}

/// Accept integers, floats and numeric strings; anything else is neutral.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score
        .filter(|s| s.is_finite())
        .map_or(NEUTRAL_QUALITY_SCORE, |s| s.round().clamp(1.0, 5.0) as u8))
}

impl ScreeningResult {
    /// Outcome used whenever the classifier cannot be reached or understood.
    #[must_use]
    pub fn neutral_default() -> Self {
        Self {
            approved: true,
            quality_score: NEUTRAL_QUALITY_SCORE,
            reason: SCREENING_UNAVAILABLE.to_string(),
            flags: Vec::new(),
            diversity_score: None,
            demographic_tags: Vec::new(),
        }
    }

    /// Clamp every field into its documented range.
    #[must_use]
    pub fn sanitize(mut self) -> Self {
        self.quality_score = self.quality_score.clamp(1, 5);
        self.reason = safe_truncate_chars(self.reason.trim(), MAX_REASON_CHARS).to_string();
        self.flags = sanitize_list(self.flags);
        self.demographic_tags = sanitize_list(self.demographic_tags);
        self.diversity_score = self
            .diversity_score
            .filter(|d| d.is_finite())
            .map(|d| d.clamp(0.0, 1.0));
        self
    }
}

/// Suggested tags keyed by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSuggestions {
    pub categories: BTreeMap<String, Vec<String>>,
}

impl TagSuggestions {
    /// Empty suggestions holding every fixed category.
    #[must_use]
    pub fn empty() -> Self {
        Self::default().sanitize()
    }

    /// Cap every category and make sure the fixed categories exist.
    #[must_use]
    pub fn sanitize(mut self) -> Self {
        self.categories = self
            .categories
            .into_iter()
            .map(|(category, tags)| (category.trim().to_string(), sanitize_list(tags)))
            .filter(|(category, _)| !category.is_empty())
            .collect();
        for category in TAG_CATEGORIES {
            self.categories.entry((*category).to_string()).or_default();
        }
        self
    }

    /// Add tags under `category`, skipping ones already present.
    pub fn merge(&mut self, category: &str, tags: &[String]) {
        let entry = self.categories.entry(category.to_string()).or_default();
        for tag in tags {
            let tag = tag.trim();
            if !tag.is_empty() && !entry.iter().any(|t| t == tag) {
                entry.push(tag.to_string());
            }
        }
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }
}

fn sanitize_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = safe_truncate_chars(item.trim(), MAX_ITEM_CHARS).to_string();
        if item.is_empty() || out.contains(&item) {
            continue;
        }
        out.push(item);
        if out.len() == MAX_LIST_ITEMS {
            break;
        }
    }
    out
}
