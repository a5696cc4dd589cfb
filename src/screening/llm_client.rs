//! OpenAI-compatible chat-completions classifier

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::classifier::ContentClassifier;
use super::types::{ScreeningError, ScreeningResult, TagSuggestions};

pub const API_KEY_ENV: &str = "KBCRAWL_LLM_API_KEY";
pub const BASE_URL_ENV: &str = "KBCRAWL_LLM_BASE_URL";
pub const MODEL_ENV: &str = "KBCRAWL_LLM_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(30);

const SCREENING_PROMPT: &str = "You screen web pages for a mental-health knowledge base. \
Judge whether the page is relevant, credible and useful. Respond with JSON only, no prose: \
{\"approved\": bool, \"quality_score\": integer 1-5, \"reason\": short string, \
\"flags\": [strings], \"diversity_score\": number 0-1, \"demographic_tags\": [strings]}";

const TAGGING_PROMPT: &str = "You tag web pages for a mental-health knowledge base. \
Respond with JSON only, no prose: an object mapping each category to a list of short tags. \
Always include the categories \"modality\", \"population\" and \"risk_factors\", \
using an empty list when nothing applies.";

/// Connection settings for [`LlmClassifier`]
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ClassifierSettings {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    /// Read `KBCRAWL_LLM_API_KEY`, `KBCRAWL_LLM_BASE_URL` and `KBCRAWL_LLM_MODEL`.
    pub fn from_env() -> Result<Self, ScreeningError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ScreeningError::Config(format!("{API_KEY_ENV} not set")))?;

        let mut settings = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            settings = settings.with_base_url(base_url);
        }
        if let Ok(model) = std::env::var(MODEL_ENV)
            && !model.trim().is_empty()
        {
            settings.model = model.trim().to_string();
        }
        Ok(settings)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Classifier backed by a chat-completions endpoint
#[derive(Debug, Clone)]
pub struct LlmClassifier {
    http_client: Client,
    settings: ClassifierSettings,
}

impl LlmClassifier {
    pub fn new(settings: ClassifierSettings) -> Result<Self, ScreeningError> {
        let http_client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ScreeningError::Config(e.to_string()))?;
        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn from_env() -> Result<Self, ScreeningError> {
        Self::new(ClassifierSettings::from_env()?)
    }

    #[must_use]
    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Send one system + user exchange and return the reply text.
    async fn chat(&self, system: &str, user: &str) -> Result<String, ScreeningError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "kbcrawl::screening", "Classifier request failed: {e}");
                ScreeningError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(target: "kbcrawl::screening", "Classifier API error {status}: {error_text}");
            return Err(ScreeningError::Api(format!("HTTP {}: {error_text}", status.as_u16())));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| ScreeningError::Parse(e.to_string()))?;

        raw.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ScreeningError::Api("Empty completion".into()))
    }
}

fn page_prompt(title: &str, text: &str, url: &str) -> String {
    format!("URL: {url}\nTitle: {title}\n\nContent:\n{text}")
}

#[async_trait]
impl ContentClassifier for LlmClassifier {
    async fn screen(
        &self,
        title: &str,
        text: &str,
        url: &str,
    ) -> Result<ScreeningResult, ScreeningError> {
        let content = self
            .chat(SCREENING_PROMPT, &page_prompt(title, text, url))
            .await?;
        let result = parse_screening_response(&content)?;
        debug!(
            target: "kbcrawl::screening",
            "Screened {url}: approved={} quality={}",
            result.approved,
            result.quality_score
        );
        Ok(result)
    }

    async fn suggest_tags(
        &self,
        title: &str,
        text: &str,
        url: &str,
    ) -> Result<TagSuggestions, ScreeningError> {
        let content = self
            .chat(TAGGING_PROMPT, &page_prompt(title, text, url))
            .await?;
        parse_tag_response(&content)
    }
}

/// The JSON object inside a model reply, without markdown code fences or prose.
fn json_payload(content: &str) -> Result<&str, ScreeningError> {
    let start = content.find('{');
    let end = content.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&content[start..=end]),
        _ => Err(ScreeningError::Parse(format!(
            "No JSON object in classifier reply: {}",
            crate::utils::safe_truncate_chars(content, 80)
        ))),
    }
}

/// Parse and sanitize a screening reply.
pub fn parse_screening_response(content: &str) -> Result<ScreeningResult, ScreeningError> {
    let payload = json_payload(content)?;
    serde_json::from_str::<ScreeningResult>(payload)
        .map(ScreeningResult::sanitize)
        .map_err(|e| ScreeningError::Parse(e.to_string()))
}

/// Parse and sanitize a tagging reply. Non-list values are ignored.
pub fn parse_tag_response(content: &str) -> Result<TagSuggestions, ScreeningError> {
    let payload = json_payload(content)?;
    let value: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(payload).map_err(|e| ScreeningError::Parse(e.to_string()))?;

    let mut tags = TagSuggestions::default();
    for (category, value) in value {
        if let serde_json::Value::Array(items) = value {
            let items: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            tags.categories.insert(category, items);
        }
    }
    Ok(tags.sanitize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json() {
        let reply = "```json\n{\"approved\": false, \"quality_score\": 2, \"reason\": \"spam\"}\n```";
        let result = parse_screening_response(reply).unwrap();
        assert!(!result.approved);
        assert_eq!(result.quality_score, 2);
        assert_eq!(result.reason, "spam");
    }

    #[test]
    fn prose_without_json_is_a_parse_error() {
        let err = parse_screening_response("I think this page is great!").unwrap_err();
        assert!(matches!(err, ScreeningError::Parse(_)));
    }

    #[test]
    fn wrong_types_are_a_parse_error() {
        let err = parse_screening_response(r#"{"approved": "maybe"}"#).unwrap_err();
        assert!(matches!(err, ScreeningError::Parse(_)));
    }

    #[test]
    fn tag_reply_ignores_non_list_values() {
        let tags = parse_tag_response(r#"{"modality": ["DBT"], "note": "n/a"}"#).unwrap();
        assert_eq!(tags.get("modality"), Some(&["DBT".to_string()][..]));
        assert!(tags.get("note").is_none());
        assert!(tags.get("population").is_some());
    }
}
