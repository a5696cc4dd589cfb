//! Content classification collaborator
//!
//! [`ContentClassifier`] is the seam; [`LlmClassifier`] talks to an
//! OpenAI-compatible chat-completions endpoint and [`NeutralClassifier`]
//! approves everything.

pub mod classifier;
pub mod llm_client;
pub mod types;

pub use classifier::{ContentClassifier, NeutralClassifier, screen_or_default, tags_or_empty};
pub use llm_client::{ClassifierSettings, LlmClassifier, parse_screening_response, parse_tag_response};
pub use types::{SCREENING_UNAVAILABLE, ScreeningError, ScreeningResult, TagSuggestions};
