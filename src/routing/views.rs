//! Lazy view binding.
//!
//! # Responsibilities
//! - Resolve a [`ComponentRef`] to a renderable [`ViewHandle`]
//! - Memoize resolved views for the lifetime of the registry
//!
//! # Design Decisions
//! - Loading is behind the [`ViewLoader`] trait; the registry knows nothing
//!   about how views are fetched
//! - Concurrent first loads of the same view share one loader call
//! - Failed loads are not cached; the next navigation retries

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::observability::metrics;
use crate::routing::node::ComponentRef;

/// Errors raised by a [`ViewLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("view {0} not found")]
    NotFound(String),

    #[error("failed to load view {view}: {reason}")]
    Load { view: String, reason: String },
}

/// A resolved view, shared between navigations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewHandle {
    source: Arc<str>,
}

impl ViewHandle {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The view path this handle was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_shell(&self) -> bool {
        matches!(&*self.source, "Layout" | "Outlet")
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Loads leaf views on demand.
pub trait ViewLoader: Send + Sync {
    fn load<'a>(&'a self, view: &'a str) -> BoxFuture<'a, Result<ViewHandle, ViewError>>;
}

/// Loader that binds every view path directly, without I/O.
#[derive(Debug, Default, Clone)]
pub struct StaticViewLoader;

impl ViewLoader for StaticViewLoader {
    fn load<'a>(&'a self, view: &'a str) -> BoxFuture<'a, Result<ViewHandle, ViewError>> {
        Box::pin(async move { Ok(ViewHandle::new(view)) })
    }
}

/// Memoizing front of a [`ViewLoader`].
pub struct ViewRegistry {
    loader: Arc<dyn ViewLoader>,
    cache: DashMap<String, Arc<OnceCell<ViewHandle>>>,
    layout: ViewHandle,
    outlet: ViewHandle,
}

impl ViewRegistry {
    pub fn new(loader: Arc<dyn ViewLoader>) -> Self {
        Self {
            loader,
            cache: DashMap::new(),
            layout: ViewHandle::new("Layout"),
            outlet: ViewHandle::new("Outlet"),
        }
    }

    /// Resolve a component, loading it on first use.
    pub async fn resolve(&self, component: &ComponentRef) -> Result<ViewHandle, ViewError> {
        let view = match component {
            ComponentRef::Layout => return Ok(self.layout.clone()),
            ComponentRef::Outlet => return Ok(self.outlet.clone()),
            ComponentRef::View(view) => view,
        };

        // Clone the cell out so no map guard is held across the await.
        let cell = self
            .cache
            .entry(view.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        if let Some(handle) = cell.get() {
            metrics::record_view_load("hit");
            return Ok(handle.clone());
        }

        let handle = cell
            .get_or_try_init(|| async {
                tracing::debug!(view = %view, "Loading view");
                let result = self.loader.load(view).await;
                metrics::record_view_load(if result.is_ok() { "loaded" } else { "failed" });
                result
            })
            .await?;
        Ok(handle.clone())
    }

    /// Returns true if `view` has been loaded.
    pub fn is_loaded(&self, view: &str) -> bool {
        self.cache
            .get(view)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    /// Number of loaded views.
    pub fn loaded_count(&self) -> usize {
        self.cache.iter().filter(|cell| cell.initialized()).count()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("loaded", &self.loaded_count())
            .finish()
    }
}
