//! Remote completion providers and the fallback priority order.
//!
//! Every vendor client implements [`CompletionProvider`]: one prompt in,
//! one text answer out. The router never looks past that trait, so vendor
//! differences (auth header shape, response JSON) stay inside each module.

pub mod anthropic;
pub mod huggingface;
pub mod openai;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{AiConfig, CredentialStore};
use crate::error::Result;

pub use anthropic::{AnthropicProvider, DEFAULT_ANTHROPIC_MODEL};
pub use huggingface::{HuggingFaceProvider, DEFAULT_HUGGINGFACE_MODEL};
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_MODEL};

/// Supported remote AI vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    HuggingFace,
}

impl ProviderKind {
    /// Fixed fallback priority: OpenAI, then Anthropic, then HuggingFace.
    pub const PRIORITY: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::HuggingFace];

    /// Short lowercase vendor name, used in logs and status summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Name of the credential entry in the config file.
    pub fn credential_key(self) -> &'static str {
        match self {
            Self::OpenAi => "openai_api_key",
            Self::Anthropic => "anthropic_api_key",
            Self::HuggingFace => "huggingface_api_key",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote AI completion vendor.
///
/// `complete` sends one user prompt and returns the answer text, or a typed
/// error on any network/auth/quota problem. The router treats every error
/// identically: skip to the next provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request a completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Vendor name, matching [`ProviderKind::as_str`] for real providers.
    fn name(&self) -> &str;
}

/// Build the provider chain from configuration, in priority order.
///
/// Providers without a credential are skipped, not errors: a deployment
/// with zero keys gets an empty chain and runs on local responses.
pub fn build_providers(
    config: &AiConfig,
    credentials: &dyn CredentialStore,
) -> Vec<Arc<dyn CompletionProvider>> {
    let mut providers: Vec<Arc<dyn CompletionProvider>> = Vec::new();
    for kind in ProviderKind::PRIORITY {
        let Some(api_key) = credentials.api_key(kind) else {
            debug!(provider = %kind, "No credential, provider skipped");
            continue;
        };
        let provider: Arc<dyn CompletionProvider> = match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(&api_key, &config.models.openai)),
            ProviderKind::Anthropic => {
                Arc::new(AnthropicProvider::new(&api_key, &config.models.anthropic))
            }
            ProviderKind::HuggingFace => Arc::new(HuggingFaceProvider::new(
                &api_key,
                &config.models.huggingface,
            )),
        };
        providers.push(provider);
    }
    providers
}
