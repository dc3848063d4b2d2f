//! JSON configuration: provider credentials, model overrides, cache tuning.
//!
//! Loaded from `~/.kitt-ai/chatai_ai_config.json`. Every field has a serde
//! default so a partial (or absent) file yields a usable configuration.
//! Environment variables fill in credentials the file leaves empty, so a
//! deployment can keep keys out of the config file entirely.
//!
//! Credentials reach the router through the [`CredentialStore`] capability
//! rather than by reading globals, so tests and embedders can substitute
//! their own lookup.

pub mod watcher;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KittError, Result};
use crate::providers::{
    ProviderKind, DEFAULT_ANTHROPIC_MODEL, DEFAULT_HUGGINGFACE_MODEL, DEFAULT_OPENAI_MODEL,
};

/// Config file name, kept from the original preferences bucket.
pub const CONFIG_FILE_NAME: &str = "chatai_ai_config.json";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AiConfig {
    /// OpenAI API key. Empty means not configured.
    pub openai_api_key: String,
    /// Anthropic API key. Empty means not configured.
    pub anthropic_api_key: String,
    /// HuggingFace API token. Empty means not configured.
    pub huggingface_api_key: String,
    /// Per-provider model overrides.
    pub models: ModelConfig,
    /// Response cache tuning.
    pub cache: CacheConfig,
}

/// Model selection per provider, with vendor defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub openai: String,
    pub anthropic: String,
    pub huggingface: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            openai: DEFAULT_OPENAI_MODEL.to_string(),
            anthropic: DEFAULT_ANTHROPIC_MODEL.to_string(),
            huggingface: DEFAULT_HUGGINGFACE_MODEL.to_string(),
        }
    }
}

/// Response cache tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false the router calls providers on every request.
    pub enabled: bool,
    /// LRU capacity bound; 0 keeps the cache unbounded.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 0,
        }
    }
}

impl AiConfig {
    /// Default config file location: `~/.kitt-ai/chatai_ai_config.json`.
    pub fn path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".kitt-ai")
            .join(CONFIG_FILE_NAME)
    }

    /// Load from the default location, then apply environment overrides.
    ///
    /// A missing file is not an error: defaults apply and credentials may
    /// still arrive via the environment.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from_path(&Self::path())?.with_env_overrides())
    }

    /// Load from an explicit path. Missing file yields defaults; a present
    /// but malformed file is an error so a typo never silently wipes keys.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                KittError::Config(format!("invalid config file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Fill empty credential fields from the conventional environment
    /// variables: `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `HF_API_TOKEN`.
    /// File entries win over the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if self.openai_api_key.is_empty() {
            if let Ok(v) = std::env::var("OPENAI_API_KEY") {
                self.openai_api_key = v;
            }
        }
        if self.anthropic_api_key.is_empty() {
            if let Ok(v) = std::env::var("ANTHROPIC_API_KEY") {
                self.anthropic_api_key = v;
            }
        }
        if self.huggingface_api_key.is_empty() {
            if let Ok(v) = std::env::var("HF_API_TOKEN") {
                self.huggingface_api_key = v;
            }
        }
        self
    }
}

// ── Credential lookup ────────────────────────────────────────────────────────

/// Read-only credential lookup capability injected into the router.
pub trait CredentialStore: Send + Sync {
    /// Return the API key for `provider`, or `None` when absent or empty.
    fn api_key(&self, provider: ProviderKind) -> Option<String>;
}

impl CredentialStore for AiConfig {
    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        let value = match provider {
            ProviderKind::OpenAi => &self.openai_api_key,
            ProviderKind::Anthropic => &self.anthropic_api_key,
            ProviderKind::HuggingFace => &self.huggingface_api_key,
        };
        (!value.is_empty()).then(|| value.clone())
    }
}

/// Fixed in-memory credential map, for tests and embedders that manage
/// their own secret storage.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    keys: HashMap<ProviderKind, String>,
}

impl StaticCredentials {
    /// Empty store: no provider configured.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        self.keys.insert(provider, key.into());
        self
    }
}

impl CredentialStore for StaticCredentials {
    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        self.keys
            .get(&provider)
            .filter(|k| !k.is_empty())
            .cloned()
    }
}

// ── Configuration status ─────────────────────────────────────────────────────

/// Read-only snapshot of which providers hold a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationStatus {
    pub openai: bool,
    pub anthropic: bool,
    pub huggingface: bool,
}

impl ConfigurationStatus {
    /// Snapshot the given credential store.
    pub fn from_credentials(credentials: &dyn CredentialStore) -> Self {
        Self {
            openai: credentials.api_key(ProviderKind::OpenAi).is_some(),
            anthropic: credentials.api_key(ProviderKind::Anthropic).is_some(),
            huggingface: credentials.api_key(ProviderKind::HuggingFace).is_some(),
        }
    }

    /// `true` when at least one provider has a credential.
    pub fn is_configured(&self) -> bool {
        self.openai || self.anthropic || self.huggingface
    }

    /// Providers with a credential, in fallback priority order.
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::PRIORITY
            .into_iter()
            .filter(|kind| match kind {
                ProviderKind::OpenAi => self.openai,
                ProviderKind::Anthropic => self.anthropic,
                ProviderKind::HuggingFace => self.huggingface,
            })
            .collect()
    }

    /// Human-readable one-line summary for status displays.
    pub fn summary(&self) -> String {
        let configured = self.configured_providers();
        if configured.is_empty() {
            return "No AI provider configured; KITT answers from local responses only"
                .to_string();
        }
        let names: Vec<&str> = configured.iter().map(|k| k.as_str()).collect();
        format!("AI providers configured: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let cfg = AiConfig::default();
        assert!(cfg.openai_api_key.is_empty());
        assert!(cfg.anthropic_api_key.is_empty());
        assert!(cfg.huggingface_api_key.is_empty());
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.cache.max_entries, 0);
        assert_eq!(cfg.models.openai, DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = AiConfig::load_from_path(&tmp.path().join("nope.json")).unwrap();
        assert!(cfg.openai_api_key.is_empty());
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"anthropic_api_key":"sk-ant-test"}"#).unwrap();
        let cfg = AiConfig::load_from_path(&path).unwrap();
        assert_eq!(cfg.anthropic_api_key, "sk-ant-test");
        assert!(cfg.openai_api_key.is_empty());
        // Untouched sections keep their defaults.
        assert!(cfg.cache.enabled);
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        let err = AiConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, KittError::Config(_)));
    }

    #[test]
    fn test_config_credential_store_skips_empty_keys() {
        let cfg = AiConfig {
            openai_api_key: "sk-test".into(),
            ..Default::default()
        };
        assert_eq!(cfg.api_key(ProviderKind::OpenAi).as_deref(), Some("sk-test"));
        assert!(cfg.api_key(ProviderKind::Anthropic).is_none());
        assert!(cfg.api_key(ProviderKind::HuggingFace).is_none());
    }

    #[test]
    fn test_static_credentials() {
        let creds = StaticCredentials::none().with(ProviderKind::HuggingFace, "hf_test");
        assert!(creds.api_key(ProviderKind::OpenAi).is_none());
        assert_eq!(
            creds.api_key(ProviderKind::HuggingFace).as_deref(),
            Some("hf_test")
        );
    }

    #[test]
    fn test_static_credentials_empty_value_not_configured() {
        let creds = StaticCredentials::none().with(ProviderKind::OpenAi, "");
        assert!(creds.api_key(ProviderKind::OpenAi).is_none());
    }

    #[test]
    fn test_status_unconfigured() {
        let status = ConfigurationStatus::from_credentials(&StaticCredentials::none());
        assert!(!status.is_configured());
        assert!(status.configured_providers().is_empty());
        assert!(status.summary().contains("No AI provider configured"));
    }

    #[test]
    fn test_status_any_single_key_configures() {
        for kind in ProviderKind::PRIORITY {
            let creds = StaticCredentials::none().with(kind, "key");
            let status = ConfigurationStatus::from_credentials(&creds);
            assert!(status.is_configured(), "{kind:?} alone should configure");
            assert_eq!(status.configured_providers(), vec![kind]);
        }
    }

    #[test]
    fn test_status_summary_lists_providers_in_priority_order() {
        let creds = StaticCredentials::none()
            .with(ProviderKind::HuggingFace, "hf")
            .with(ProviderKind::OpenAi, "oa");
        let status = ConfigurationStatus::from_credentials(&creds);
        assert_eq!(status.summary(), "AI providers configured: openai, huggingface");
    }

    #[test]
    fn test_config_roundtrip_through_serde() {
        let cfg = AiConfig {
            openai_api_key: "sk-x".into(),
            cache: CacheConfig {
                enabled: false,
                max_entries: 64,
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.openai_api_key, "sk-x");
        assert!(!back.cache.enabled);
        assert_eq!(back.cache.max_entries, 64);
    }
}
