//! Route file watcher for hot reload.
//!
//! # Responsibilities
//! - Watch the directory holding the config file
//! - Reload and validate the file when an event touches it
//! - Forward configs whose text changed; drop invalid ones
//!
//! # Design Decisions
//! - The parent directory is watched, so editors that save by rename are seen
//! - Identical text is not forwarded, which collapses the burst of events a
//!   single save produces

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::AppConfig;

/// Sends a validated config every time the watched file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|name| name.to_os_string());
        let last_seen = Mutex::new(fs::read_to_string(&self.path).ok());
        let path = self.path.clone();
        let tx = self.update_tx;

        let handler = move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, "Config watch error");
                    return;
                }
            };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            let touches_file = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if !touches_file {
                return;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Config file unreadable, keeping current routes");
                    return;
                }
            };
            {
                let mut last = last_seen.lock().unwrap_or_else(|e| e.into_inner());
                if last.as_deref() == Some(content.as_str()) {
                    return;
                }
                *last = Some(content.clone());
            }

            match parse_config(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        routes = config.routes.len(),
                        "Config file changed, reloading routes"
                    );
                    let _ = tx.send(config);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Invalid config, keeping current routes");
                }
            }
        };

        let mut watcher = RecommendedWatcher::new(
            handler,
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}
