//! OpenAI chat-completions provider.
//!
//! Minimal single-turn call: persona system prompt plus one user message.
//! Bearer-token auth via `Authorization` header.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::error::{parse_provider_error, KittError, Result};
use crate::persona;

use super::CompletionProvider;

/// OpenAI REST API base.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Default model when none is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Per-request timeout. Answers here are short chat turns.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const MAX_COMPLETION_TOKENS: u32 = 512;

/// OpenAI provider speaking the `/chat/completions` endpoint.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
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

    /// Build the chat-completions request body: persona system prompt plus
    /// the user turn.
    fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": persona::SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": 0.7
        })
    }

    /// Pull the answer text out of a chat-completions response.
    fn extract_text(response: &Value) -> Option<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", OPENAI_API_BASE)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, "OpenAI completion request");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| KittError::Provider(format!("OpenAI request failed: {}", e)))?;

        if response.status().is_success() {
            let body: Value = response.json().await.map_err(|e| {
                KittError::Provider(format!("Failed to parse OpenAI response: {}", e))
            })?;
            return Self::extract_text(&body).ok_or_else(|| {
                KittError::Provider("OpenAI response contained no message content".to_string())
            });
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|v| {
                v["error"]["message"]
                    .as_str()
                    .map(|s| format!("OpenAI API error: {}", s))
            })
            .unwrap_or_else(|| format!("OpenAI API error: {}", error_text));

        Err(parse_provider_error(status, &message))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_has_model_and_user_turn() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_OPENAI_MODEL);
        let body = provider.build_request_body("Bonjour");
        assert_eq!(body["model"], DEFAULT_OPENAI_MODEL);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Bonjour");
    }

    #[test]
    fn test_request_body_carries_persona_system_prompt() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_OPENAI_MODEL);
        let body = provider.build_request_body("Bonjour");
        assert_eq!(body["messages"][0]["role"], "system");
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("KITT"));
    }

    #[test]
    fn test_extract_text() {
        let response = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Bonjour Michael." } }]
        });
        assert_eq!(
            OpenAiProvider::extract_text(&response).as_deref(),
            Some("Bonjour Michael.")
        );
    }

    #[test]
    fn test_extract_text_missing_choices() {
        let response = serde_json::json!({ "choices": [] });
        assert!(OpenAiProvider::extract_text(&response).is_none());
    }

    #[test]
    fn test_api_url() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_OPENAI_MODEL);
        assert_eq!(
            provider.api_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_name_matches_kind() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_OPENAI_MODEL);
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = OpenAiProvider::new("sk-very-secret", DEFAULT_OPENAI_MODEL);
        let debug = format!("{provider:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
