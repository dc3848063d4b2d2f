//! File-mtime polling watcher for hot-reloading the AI config.
//!
//! Long-lived embedders run this alongside the router so a key added to
//! `chatai_ai_config.json` takes effect without a restart: each emitted
//! [`AiConfig`] can be turned into a fresh router. A file that fails to
//! parse is rejected and the running configuration stays in effect.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::AiConfig;

/// Polling-based config watcher.
pub struct ConfigWatcher {
    path: PathBuf,
    poll_interval: Duration,
    last_mtime: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf, poll_interval: Duration) -> Self {
        Self {
            path,
            poll_interval,
            last_mtime: None,
        }
    }

    /// Watch the default config location.
    pub fn default_path(poll_interval: Duration) -> Self {
        Self::new(AiConfig::path(), poll_interval)
    }

    /// Poll until shutdown, sending each successfully reloaded config on `tx`.
    pub async fn watch(
        mut self,
        tx: mpsc::UnboundedSender<AiConfig>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        self.last_mtime = read_mtime(&self.path);
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("AI config watcher shutting down");
                        return;
                    }
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            if *shutdown_rx.borrow() {
                return;
            }

            let current = read_mtime(&self.path);
            let changed = match (self.last_mtime, current) {
                (Some(prev), Some(next)) => next != prev,
                (None, Some(_)) => true,
                _ => false,
            };
            if !changed {
                continue;
            }

            self.last_mtime = current;
            match AiConfig::load_from_path(&self.path) {
                Ok(config) => {
                    debug!(path = %self.path.display(), "AI config changed, reloading");
                    if tx.send(config.with_env_overrides()).is_err() {
                        warn!("AI config watcher receiver dropped, stopping watcher");
                        return;
                    }
                }
                Err(err) => {
                    warn!(
                        path = %self.path.display(),
                        error = %err,
                        "AI config reload rejected; keeping running configuration"
                    );
                }
            }
        }
    }
}

fn read_mtime(path: &PathBuf) -> Option<SystemTime> {
    std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn watcher_emits_on_change() {
        let tmp = TempDir::new().unwrap();
        let cfg_path = tmp.path().join("chatai_ai_config.json");
        std::fs::write(&cfg_path, "{}").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watcher = ConfigWatcher::new(cfg_path.clone(), Duration::from_millis(25));
        let handle = tokio::spawn(watcher.watch(tx, shutdown_rx));

        tokio::time::sleep(Duration::from_millis(40)).await;
        std::fs::write(&cfg_path, r#"{"openai_api_key":"sk-reloaded"}"#).unwrap();

        let loaded = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.openai_api_key, "sk-reloaded");

        let _ = shutdown_tx.send(true);
        let _ = handle.await;
    }

    #[tokio::test]
    async fn watcher_rejects_malformed_file_and_recovers() {
        let tmp = TempDir::new().unwrap();
        let cfg_path = tmp.path().join("chatai_ai_config.json");
        std::fs::write(&cfg_path, "{}").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watcher = ConfigWatcher::new(cfg_path.clone(), Duration::from_millis(25));
        let handle = tokio::spawn(watcher.watch(tx, shutdown_rx));

        // Malformed write: no config may be emitted for it.
        tokio::time::sleep(Duration::from_millis(40)).await;
        std::fs::write(&cfg_path, "{broken").unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;

        // A later valid write still gets picked up.
        std::fs::write(&cfg_path, r#"{"anthropic_api_key":"sk-ant-after"}"#).unwrap();
        let loaded = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.anthropic_api_key, "sk-ant-after");

        let _ = shutdown_tx.send(true);
        let _ = handle.await;
    }
}
