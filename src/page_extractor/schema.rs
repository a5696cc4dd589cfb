use serde::{Deserialize, Serialize};

/// Title and plain text pulled from one HTML document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
}

impl ExtractedPage {
    /// Length of the plain text in characters
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.text.chars().count()
    }
}
