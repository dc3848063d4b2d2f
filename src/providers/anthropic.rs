//! Anthropic messages provider.
//!
//! Auth via `x-api-key` header plus the required `anthropic-version`
//! header. The persona prompt travels in the top-level `system` field.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::error::{parse_provider_error, KittError, Result};
use crate::persona;

use super::CompletionProvider;

/// Anthropic REST API base.
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

/// API version header value required on every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model when none is configured.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

const REQUEST_TIMEOUT_SECS: u64 = 30;

const MAX_COMPLETION_TOKENS: u32 = 512;

/// Anthropic provider speaking the `/messages` endpoint.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_COMPLETION_TOKENS,
            "system": persona::SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }

    /// Concatenate the text blocks of a messages response.
    ///
    /// Returns `None` when no text block is present at all, so the router
    /// can fall through instead of caching an empty answer.
    fn extract_text(response: &Value) -> Option<String> {
        let blocks = response["content"].as_array()?;
        let text: Vec<&str> = blocks
            .iter()
            .filter(|b| b["type"] == "text")
            .filter_map(|b| b["text"].as_str())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join(""))
        }
    }

    fn api_url(&self) -> String {
        format!("{}/messages", ANTHROPIC_API_BASE)
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, "Anthropic completion request");

        let response = self
            .client
            .post(self.api_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| KittError::Provider(format!("Anthropic request failed: {}", e)))?;

        if response.status().is_success() {
            let body: Value = response.json().await.map_err(|e| {
                KittError::Provider(format!("Failed to parse Anthropic response: {}", e))
            })?;
            return Self::extract_text(&body).ok_or_else(|| {
                KittError::Provider("Anthropic response contained no text blocks".to_string())
            });
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|v| {
                v["error"]["message"]
                    .as_str()
                    .map(|s| format!("Anthropic API error: {}", s))
            })
            .unwrap_or_else(|| format!("Anthropic API error: {}", error_text));

        Err(parse_provider_error(status, &message))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
