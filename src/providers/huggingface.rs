//! HuggingFace Inference API provider.
//!
//! Text-generation endpoint keyed by model id. There is no separate system
//! role, so the persona prompt is prepended to the input text. A model that
//! is still loading answers 503; the router just moves on to the fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::error::{parse_provider_error, KittError, Result};
use crate::persona;

use super::CompletionProvider;

/// Inference API base; the model id is appended to the path.
const HF_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Default model when none is configured.
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";

const REQUEST_TIMEOUT_SECS: u64 = 30;

const MAX_NEW_TOKENS: u32 = 256;

/// HuggingFace provider speaking the hosted Inference API.
pub struct HuggingFaceProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl HuggingFaceProvider {
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

    /// Persona prompt and user text folded into a single input string.
    fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "inputs": format!("{}\n\n{}", persona::SYSTEM_PROMPT, prompt),
            "parameters": {
                "max_new_tokens": MAX_NEW_TOKENS,
                "return_full_text": false
            }
        })
    }

    /// The API answers with `[{"generated_text": ...}]`; some error shapes
    /// come back 200 with an `error` field instead.
    fn extract_text(response: &Value) -> Option<String> {
        response[0]["generated_text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn api_url(&self) -> String {
        format!("{}/{}", HF_API_BASE, self.model)
    }
}

#[async_trait]
impl CompletionProvider for HuggingFaceProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, "HuggingFace completion request");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| KittError::Provider(format!("HuggingFace request failed: {}", e)))?;

        if response.status().is_success() {
            let body: Value = response.json().await.map_err(|e| {
                KittError::Provider(format!("Failed to parse HuggingFace response: {}", e))
            })?;
            return Self::extract_text(&body).ok_or_else(|| {
                let detail = body["error"].as_str().unwrap_or("no generated text");
                KittError::Provider(format!("HuggingFace inference error: {}", detail))
            });
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|v| {
                v["error"]
                    .as_str()
                    .map(|s| format!("HuggingFace API error: {}", s))
            })
            .unwrap_or_else(|| format!("HuggingFace API error: {}", error_text));

        Err(parse_provider_error(status, &message))
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
