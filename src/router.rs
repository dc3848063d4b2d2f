//! Request routing: cache, provider fallback chain, local responder.
//!
//! [`RequestRouter::process_user_input`] is the single entry point and it
//! never fails outward: provider errors are logged and absorbed, and when
//! the whole chain is exhausted the KITT [`LocalResponder`] answers. The
//! [`Reply`] carries a [`ReplySource`] discriminant so callers can tell a
//! real provider answer from a canned one without parsing text.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::{CacheStats, ResponseCache};
use crate::config::{AiConfig, CacheConfig, ConfigurationStatus, CredentialStore};
use crate::persona::LocalResponder;
use crate::providers::{build_providers, CompletionProvider};

/// Where a reply's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Served from the response cache without any provider call.
    Cache,
    /// Answered by the named remote provider.
    Provider(String),
    /// Answered by the local rule-based responder.
    Fallback,
}

/// A routed response: always non-empty text plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    /// `true` when the local responder produced this text.
    pub fn is_fallback(&self) -> bool {
        self.source == ReplySource::Fallback
    }

    /// `true` when the text came from the cache.
    pub fn is_cached(&self) -> bool {
        self.source == ReplySource::Cache
    }
}

/// Orchestrator routing user input through cache, providers, and fallback.
///
/// Constructed once per session. The cache sits behind a `tokio` mutex so
/// `&self` methods stay safe to call from an async context; there is no
/// internal parallelism — providers are tried strictly one at a time.
pub struct RequestRouter {
    providers: Vec<Arc<dyn CompletionProvider>>,
    responder: LocalResponder,
    cache: Mutex<ResponseCache>,
    cache_enabled: bool,
    status: ConfigurationStatus,
}

impl RequestRouter {
    /// Build from configuration, using the config itself for credentials.
    pub fn new(config: &AiConfig) -> Self {
        let credentials: Arc<dyn CredentialStore> = Arc::new(config.clone());
        Self::with_credentials(config, credentials)
    }

    /// Build from configuration with an injected credential store.
    pub fn with_credentials(config: &AiConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let providers = build_providers(config, credentials.as_ref());
        let status = ConfigurationStatus::from_credentials(credentials.as_ref());
        Self::assemble(providers, status, config.cache.clone())
    }

    /// Build from an explicit provider chain. Used by tests and embedders
    /// that construct providers themselves.
    pub fn with_providers(
        providers: Vec<Arc<dyn CompletionProvider>>,
        status: ConfigurationStatus,
        cache: CacheConfig,
    ) -> Self {
        Self::assemble(providers, status, cache)
    }

    fn assemble(
        providers: Vec<Arc<dyn CompletionProvider>>,
        status: ConfigurationStatus,
        cache: CacheConfig,
    ) -> Self {
        let store = if cache.max_entries > 0 {
            ResponseCache::with_capacity(cache.max_entries)
        } else {
            ResponseCache::new()
        };
        Self {
            providers,
            responder: LocalResponder,
            cache: Mutex::new(store),
            cache_enabled: cache.enabled,
            status,
        }
    }

    /// Route one user input to a response. Never fails.
    ///
    /// Cache lookup first (exact input string); on miss, providers in
    /// priority order with any error absorbed; the local responder closes
    /// the chain. The produced text — provider or fallback — is cached
    /// before returning.
    pub async fn process_user_input(&self, input: &str) -> Reply {
        if self.cache_enabled {
            if let Some(hit) = self.cache.lock().await.get(input) {
                debug!("Response served from cache");
                return Reply {
                    text: hit,
                    source: ReplySource::Cache,
                };
            }
        }

        let (text, source) = match self.try_providers(input).await {
            Some((name, text)) => (text, ReplySource::Provider(name)),
            None => {
                debug!("All providers exhausted, using local responder");
                (self.responder.respond(input), ReplySource::Fallback)
            }
        };

        if self.cache_enabled {
            self.cache.lock().await.put(input.to_string(), text.clone());
        }

        Reply { text, source }
    }

    /// Try each configured provider in order; first non-blank answer wins.
    async fn try_providers(&self, input: &str) -> Option<(String, String)> {
        for provider in &self.providers {
            match provider.complete(input).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(provider = provider.name(), "Provider answered");
                    return Some((provider.name().to_string(), text));
                }
                Ok(_) => {
                    warn!(
                        provider = provider.name(),
                        "Provider returned a blank answer, trying next"
                    );
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        "Provider failed, trying next"
                    );
                }
            }
        }
        None
    }

    /// `true` when at least one provider credential is present.
    pub fn is_configured(&self) -> bool {
        self.status.is_configured()
    }

    /// Human-readable summary of the provider configuration.
    pub fn configuration_status(&self) -> String {
        self.status.summary()
    }

    /// Empty the response cache. Idempotent; configuration is untouched.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    /// Snapshot of cache entry and hit counts.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }
}
