//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use route_table::routing::views::ViewError;
use route_table::routing::{ViewHandle, ViewLoader};
use route_table::{RouteNode, RouteTable, RoutesConfig};

/// Loader that counts calls and delays selected views.
#[derive(Default)]
pub struct ScriptedLoader {
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every load of `view` by `delay`.
    pub fn slow(mut self, view: &str, delay: Duration) -> Self {
        self.delays.insert(view.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ViewLoader for ScriptedLoader {
    fn load<'a>(&'a self, view: &'a str) -> BoxFuture<'a, Result<ViewHandle, ViewError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(view) {
                tokio::time::sleep(*delay).await;
            }
            Ok(ViewHandle::new(view))
        })
    }
}

/// Built-in configuration with a shared loader handle.
pub fn builtin(loader: ScriptedLoader) -> (RoutesConfig, Arc<ScriptedLoader>) {
    (RoutesConfig::default(), Arc::new(loader))
}

/// Constant routes followed by the given async routes, compiled.
pub fn resolved_table(async_routes: Vec<RouteNode>) -> RouteTable {
    let nodes = route_table::routes::constant_routes()
        .into_iter()
        .chain(async_routes)
        .collect();
    RouteTable::compile(nodes).unwrap()
}
