//! Route config file watcher for hot reload.
//!
//! # Data Flow
//! ```text
//! notify event (modify / create)
//!     → load_config (parse + validate)
//!     → channel
//!     → apply_update → RouterEngine::replace_async_routes
//! ```
//!
//! # Design Decisions
//! - Invalid files are logged and skipped; the engine keeps its tables
//! - Only async routes are hot-swapped; constant routes and router settings
//!   are fixed for the engine's lifetime

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RoutesConfig;
use crate::routing::router::TableError;
use crate::routing::RouterEngine;

/// Watches the route config file and emits validated configurations.
pub struct ConfigWatcher {
    reloader: Reloader,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for validated configurations.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RoutesConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let reloader = Reloader {
            path: path.to_path_buf(),
            update_tx,
        };
        (Self { reloader }, update_rx)
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.reloader.path.clone();
        let reloader = self.reloader;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                reloader.handle(res);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

struct Reloader {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RoutesConfig>,
}

impl Reloader {
    /// Reload on a content change. Returns true if an update was sent.
    fn handle(&self, res: notify::Result<Event>) -> bool {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = %e, "Watch error");
                return false;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return false;
        }

        tracing::info!(path = ?self.path, "Route config change detected, reloading");
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Rejected route config reload, keeping current tables");
                return false;
            }
        };

        if self.update_tx.send(config).is_err() {
            tracing::warn!(path = ?self.path, "Route config receiver closed, reload dropped");
            return false;
        }
        true
    }
}

/// Apply a reloaded configuration to a running engine.
pub fn apply_update(engine: &RouterEngine, update: RoutesConfig) -> Result<(), TableError> {
    if update.constant_routes != engine.constant_routes() {
        tracing::warn!("Constant routes changed; restart to apply them");
    }
    engine.replace_async_routes(update.async_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, EventKind, ModifyKind};
    use std::sync::Arc;

    use crate::routing::{RouteNode, Roles, StaticViewLoader};

    const VALID: &str = r#"
        [router]
        max_redirects = 5
    "#;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "route-table-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn reloader(path: &Path) -> (Reloader, mpsc::UnboundedReceiver<RoutesConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Reloader {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    fn modified() -> notify::Result<Event> {
        Ok(Event::new(EventKind::Modify(ModifyKind::Any)))
    }

    #[test]
    fn test_modified_file_is_reloaded() {
        let path = temp_config("reload", VALID);
        let (reloader, mut updates) = reloader(&path);

        assert!(reloader.handle(modified()));
        assert!(reloader.handle(Ok(Event::new(EventKind::Create(CreateKind::File)))));

        let config = updates.try_recv().unwrap();
        assert_eq!(config.router.max_redirects, 5);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let path = temp_config("invalid", "[router]\nmax_redirects = 0\n");
        let (reloader, mut updates) = reloader(&path);

        assert!(!reloader.handle(modified()));
        assert!(updates.try_recv().is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_access_events_are_ignored() {
        let path = temp_config("access", VALID);
        let (reloader, mut updates) = reloader(&path);

        assert!(!reloader.handle(Ok(Event::new(EventKind::Access(AccessKind::Any)))));
        assert!(updates.try_recv().is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_closed_receiver_drops_reload() {
        let path = temp_config("closed", VALID);
        let (reloader, updates) = reloader(&path);
        drop(updates);

        assert!(!reloader.handle(modified()));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_update_swaps_async_routes() {
        let engine = RouterEngine::new(&RoutesConfig::default(), Arc::new(StaticViewLoader)).unwrap();
        engine.attach(Roles::new(["editor"])).unwrap();

        let mut update = RoutesConfig::default();
        update.async_routes.insert(
            0,
            RouteNode::layout("/reports")
                .children(vec![RouteNode::view("index", "reports/index").named("Reports")]),
        );

        apply_update(&engine, update).unwrap();
        assert!(engine.table().contains_path("/reports/index"));
        assert!(engine.table().contains_path("/icon/index"));
    }
}
