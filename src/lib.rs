//! kitt-ai: AI request routing with provider fallback and response caching.
//!
//! User text goes to the first remote provider that answers — OpenAI, then
//! Anthropic, then HuggingFace — and to the local KITT responder when no
//! key is configured or every call fails. Responses are cached by exact
//! input text, and every reply is tagged with its origin so an application
//! can tell a live answer from a canned one.
//!
//! # Example
//!
//! ```rust,ignore
//! use kitt_ai::{AiConfig, RequestRouter};
//!
//! let config = AiConfig::load()?;
//! let router = RequestRouter::new(&config);
//!
//! let reply = router.process_user_input("Bonjour").await;
//! println!("[{:?}] {}", reply.source, reply.text);
//!
//! // Same input again: served from cache, no provider call.
//! let again = router.process_user_input("Bonjour").await;
//! assert!(again.is_cached());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod persona;
pub mod providers;
pub mod router;

pub use cache::{CacheStats, ResponseCache};
pub use config::{
    AiConfig, CacheConfig, ConfigurationStatus, CredentialStore, ModelConfig, StaticCredentials,
};
pub use config::watcher::ConfigWatcher;
pub use error::{KittError, Result};
pub use persona::{LocalResponder, PERSONA_NAME};
pub use providers::{
    AnthropicProvider, CompletionProvider, HuggingFaceProvider, OpenAiProvider, ProviderKind,
};
pub use router::{Reply, ReplySource, RequestRouter};
