//! Router engine: live table snapshot and navigation.
//!
//! # Data Flow
//! ```text
//! boot:        constant routes → RouteTable → live snapshot
//! attach:      async routes + roles → PermissionFilter
//!              → constant ++ filtered → RouteTable → atomic swap
//! navigate:    location → snapshot.resolve → load views → commit
//! ```
//!
//! # Design Decisions
//! - Roles, async routes, the live table and the full table form one
//!   `EngineState` swapped whole through `ArcSwap`; every swap bumps its
//!   generation
//! - A navigation resolves against one state and commits only if that state
//!   is still live; after a swap it resolves again against the new table
//! - Last writer wins: each navigation takes a sequence number and only the
//!   latest requested one is committed, stale ones report `Superseded`
//! - Committed navigations always reset scroll to the top

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::{ArcSwap, Guard};
use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{RouterSettings, RoutesConfig};
use crate::observability::metrics;
use crate::routing::node::RouteNode;
use crate::routing::permission::{PermissionFilter, Roles};
use crate::routing::router::{
    NavigationError, Resolution, ResolvedRoute, RouteStatus, RouteTable, TableError,
};
use crate::routing::views::{ViewError, ViewHandle, ViewLoader, ViewRegistry};

/// Resolve attempts per navigation when the table keeps being swapped.
const MAX_RESOLVE_ATTEMPTS: usize = 4;

/// Errors surfaced by [`RouterEngine::navigate`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Scroll position applied after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollPosition {
    pub x: u32,
    pub y: u32,
}

impl ScrollPosition {
    pub const TOP: ScrollPosition = ScrollPosition { x: 0, y: 0 };
}

/// A committed navigation.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub sequence: u64,
    pub route: Arc<ResolvedRoute>,
    /// Views for the matched chain, outermost first.
    pub views: Vec<ViewHandle>,
    pub scroll: ScrollPosition,
}

/// What a navigation request ended in.
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// The route was resolved, its views loaded, and it is now current.
    Committed(Navigation),
    /// Outbound link; nothing is rendered internally.
    External(String),
    /// A newer navigation was requested before this one finished.
    Superseded { location: String },
}

/// Everything a navigation reads, swapped as one unit.
#[derive(Debug, Clone)]
struct EngineState {
    generation: u64,
    roles: Option<Arc<Roles>>,
    async_routes: Arc<Vec<RouteNode>>,
    /// Constant routes plus the async routes visible to `roles`.
    live: Arc<RouteTable>,
    /// Constant routes plus every async route, unfiltered.
    full: Arc<RouteTable>,
    current: Option<Arc<Navigation>>,
}

enum Commit {
    Done,
    Superseded,
    Reattached,
}

/// Holds the live route table and performs navigations.
pub struct RouterEngine {
    settings: RouterSettings,
    filter: PermissionFilter,
    constant: Arc<Vec<RouteNode>>,
    constant_table: Arc<RouteTable>,
    views: ViewRegistry,
    sequence: AtomicU64,
    state: ArcSwap<EngineState>,
}

impl RouterEngine {
    /// Build an engine with only the constant routes attached.
    pub fn new(config: &RoutesConfig, loader: Arc<dyn ViewLoader>) -> Result<Self, TableError> {
        let constant = config.constant_routes.clone();
        let constant_table = Arc::new(RouteTable::compile(constant.clone())?);
        let full = compile_full(&constant, &config.async_routes)?;

        tracing::info!(
            constant_records = constant_table.len(),
            full_records = full.len(),
            "Router engine initialized"
        );
        metrics::record_table_swap(constant_table.len());

        let state = EngineState {
            generation: 0,
            roles: None,
            async_routes: Arc::new(config.async_routes.clone()),
            live: Arc::clone(&constant_table),
            full: Arc::new(full),
            current: None,
        };

        Ok(Self {
            settings: config.router.clone(),
            filter: PermissionFilter::new(&config.permission),
            constant: Arc::new(constant),
            constant_table,
            views: ViewRegistry::new(loader),
            sequence: AtomicU64::new(0),
            state: ArcSwap::from_pointee(state),
        })
    }

    /// Attach the async routes visible to `roles`, replacing the live table.
    pub fn attach(&self, roles: Roles) -> Result<Arc<RouteTable>, TableError> {
        let roles = Arc::new(roles);
        let state = self.update(|state| {
            let live = self.build_table(&state.async_routes, &roles)?;
            Ok(EngineState {
                generation: state.generation + 1,
                roles: Some(Arc::clone(&roles)),
                live: Arc::new(live),
                ..state.clone()
            })
        })?;

        tracing::info!(
            roles = %roles,
            generation = state.generation,
            records = state.live.len(),
            diagnostics = state.live.diagnostics().len(),
            "Route table attached"
        );
        Ok(Arc::clone(&state.live))
    }

    /// Drop every async route (logout).
    pub fn detach(&self) -> Arc<RouteTable> {
        let previous = self.state.rcu(|state| {
            Arc::new(EngineState {
                generation: state.generation + 1,
                roles: None,
                live: Arc::clone(&self.constant_table),
                current: None,
                ..(**state).clone()
            })
        });
        metrics::record_table_swap(self.constant_table.len());
        tracing::info!(
            generation = previous.generation + 1,
            records = self.constant_table.len(),
            "Async routes detached"
        );
        Arc::clone(&self.constant_table)
    }

    /// Replace the async route set, re-attaching for the current roles.
    ///
    /// Nothing changes if the new set does not compile.
    pub fn replace_async_routes(&self, routes: Vec<RouteNode>) -> Result<(), TableError> {
        let routes = Arc::new(routes);
        let full = Arc::new(compile_full(&self.constant, &routes)?);

        let state = self.update(|state| {
            let live = match &state.roles {
                Some(roles) => Arc::new(self.build_table(&routes, roles)?),
                None => Arc::clone(&state.live),
            };
            Ok(EngineState {
                generation: state.generation + 1,
                async_routes: Arc::clone(&routes),
                live,
                full: Arc::clone(&full),
                ..state.clone()
            })
        })?;

        tracing::info!(
            generation = state.generation,
            async_routes = routes.len(),
            "Async routes replaced"
        );
        Ok(())
    }

    /// Swap in the state `next` derives from the current one.
    ///
    /// `next` runs again if another writer swapped first, so it always
    /// builds on the latest state.
    fn update<F>(&self, mut next: F) -> Result<Arc<EngineState>, TableError>
    where
        F: FnMut(&EngineState) -> Result<EngineState, TableError>,
    {
        let mut state = self.state.load_full();
        loop {
            let candidate = Arc::new(next(&*state)?);
            let previous = self.state.compare_and_swap(&state, Arc::clone(&candidate));
            if Arc::ptr_eq(&*previous, &state) {
                metrics::record_table_swap(candidate.live.len());
                return Ok(candidate);
            }
            state = Guard::into_inner(previous);
        }
    }

    fn build_table(&self, routes: &[RouteNode], roles: &Roles) -> Result<RouteTable, TableError> {
        let filtered = self.filter.apply(routes, roles);
        let nodes: Vec<RouteNode> = self.constant.iter().cloned().chain(filtered).collect();
        RouteTable::compile(nodes)
    }

    /// Current live table snapshot.
    pub fn table(&self) -> Arc<RouteTable> {
        Arc::clone(&self.state.load().live)
    }

    /// Roles of the attached identity, if any.
    pub fn roles(&self) -> Option<Arc<Roles>> {
        self.state.load().roles.clone()
    }

    /// Counts table swaps since the engine was built.
    pub fn generation(&self) -> u64 {
        self.state.load().generation
    }

    /// Last committed navigation.
    pub fn current(&self) -> Option<Arc<Navigation>> {
        self.state.load().current.clone()
    }

    pub fn constant_routes(&self) -> &[RouteNode] {
        &self.constant
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Resolve `location` against the live table without loading views.
    pub fn resolve(&self, location: &str) -> Result<Resolution, NavigationError> {
        self.resolve_in(&self.state.load_full(), location)
    }

    fn resolve_in(&self, state: &EngineState, location: &str) -> Result<Resolution, NavigationError> {
        let route = match state.live.resolve(location, &self.settings)? {
            Resolution::Internal(route) => route,
            external => return Ok(external),
        };

        // Asking for the not-found page itself is not a denial.
        if route.status != RouteStatus::NotFound || route.redirected_from.is_none() {
            return Ok(Resolution::Internal(route));
        }

        // Filtered out for this identity rather than missing.
        match &self.settings.unauthorized_path {
            Some(denied) if state.full.contains_path(location) => {
                tracing::debug!(location, "Route not attached for current roles");
                let mut denied_route = match state.live.resolve(denied, &self.settings)? {
                    Resolution::Internal(route) => route,
                    external => return Ok(external),
                };
                denied_route.status = RouteStatus::Unauthorized;
                denied_route.redirected_from = Some(route.redirected_from.unwrap_or(route.path));
                Ok(Resolution::Internal(denied_route))
            }
            _ => Ok(Resolution::Internal(route)),
        }
    }

    /// Navigate to `location`.
    pub async fn navigate(&self, location: &str) -> Result<NavigationOutcome, EngineError> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        tracing::debug!(sequence, location, "Navigation requested");

        for attempt in 1..=MAX_RESOLVE_ATTEMPTS {
            let state = self.state.load_full();
            let route = match self.resolve_in(&state, location)? {
                Resolution::Internal(route) => route,
                Resolution::External(url) => {
                    metrics::record_navigation("external", started);
                    return Ok(NavigationOutcome::External(url));
                }
            };

            let mut views = Vec::with_capacity(route.matched.len());
            for matched in &route.matched {
                if let Some(component) = &matched.component {
                    views.push(self.views.resolve(component).await?);
                }
            }

            if self.sequence.load(Ordering::SeqCst) != sequence {
                return Ok(self.superseded(sequence, location, started));
            }

            let navigation = Arc::new(Navigation {
                sequence,
                route: Arc::new(route),
                views,
                scroll: ScrollPosition::TOP,
            });

            match self.commit(state.generation, &navigation) {
                Commit::Done => {
                    tracing::info!(
                        sequence,
                        location,
                        path = %navigation.route.path,
                        status = ?navigation.route.status,
                        "Navigation committed"
                    );
                    metrics::record_navigation(status_label(navigation.route.status), started);
                    return Ok(NavigationOutcome::Committed((*navigation).clone()));
                }
                Commit::Superseded => return Ok(self.superseded(sequence, location, started)),
                Commit::Reattached => {
                    tracing::debug!(
                        sequence,
                        location,
                        attempt,
                        "Route table swapped during navigation, resolving again"
                    );
                }
            }
        }

        tracing::warn!(sequence, location, "Route table kept changing, navigation dropped");
        Ok(self.superseded(sequence, location, started))
    }

    /// Make `navigation` current if the table it was resolved against is
    /// still live and no newer navigation has been committed.
    fn commit(&self, generation: u64, navigation: &Arc<Navigation>) -> Commit {
        let mut commit = Commit::Done;
        self.state.rcu(|state| {
            if state.generation != generation {
                commit = Commit::Reattached;
                return Arc::clone(state);
            }
            if let Some(existing) = &state.current {
                if existing.sequence > navigation.sequence {
                    commit = Commit::Superseded;
                    return Arc::clone(state);
                }
            }
            commit = Commit::Done;
            Arc::new(EngineState {
                current: Some(Arc::clone(navigation)),
                ..(**state).clone()
            })
        });
        commit
    }

    fn superseded(&self, sequence: u64, location: &str, started: Instant) -> NavigationOutcome {
        tracing::debug!(sequence, location, "Navigation superseded");
        metrics::record_navigation("superseded", started);
        NavigationOutcome::Superseded {
            location: location.to_string(),
        }
    }
}

impl std::fmt::Debug for RouterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("RouterEngine")
            .field("generation", &state.generation)
            .field("records", &state.live.len())
            .field("roles", &state.roles)
            .field("views", &self.views)
            .finish()
    }
}

fn compile_full(constant: &[RouteNode], routes: &[RouteNode]) -> Result<RouteTable, TableError> {
    RouteTable::compile(constant.iter().chain(routes).cloned().collect())
}

fn status_label(status: RouteStatus) -> &'static str {
    match status {
        RouteStatus::Found => "found",
        RouteStatus::NotFound => "not_found",
        RouteStatus::Unauthorized => "unauthorized",
    }
}
