//! Story generation service
//!
//! A stateless pass-through to the completion provider: given a prompt
//! string, return the generated story text. The provider's protocol is an
//! external concern; this service holds nothing but an HTTP client and its
//! request settings.

use crate::config::StoryConfig;
use crate::error::{FabulaError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Completion provider endpoint
const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Story generation pass-through
pub struct StoryService {
    settings: StoryConfig,
    api_key: String,
    client: reqwest::Client,
}

/// Provider message format
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Provider response format
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}

impl StoryService {
    /// Create a new story service
    pub fn new(settings: StoryConfig, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(FabulaError::Config(config::ConfigError::Message(
                "ANTHROPIC_API_KEY not set".to_string(),
            )));
        }

        Ok(Self {
            settings,
            api_key,
            client: reqwest::Client::new(),
        })
    }

    /// Generate a story for the given prompt and return the trimmed text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(FabulaError::Validation(
                "Prompt must not be empty".to_string(),
            ));
        }

        let story = self.call_api(prompt).await?;
        Ok(story.trim().to_string())
    }

    async fn call_api(&self, prompt: &str) -> Result<String> {
        debug!("Calling completion API, model={}", self.settings.model);

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(FabulaError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(FabulaError::Completion(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .map_err(|e| FabulaError::Completion(format!("Failed to parse response: {}", e)))?;

        api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| FabulaError::Completion("Empty response from API".to_string()))
    }
}
