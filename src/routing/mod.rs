//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at boot and on every role change):
//!     RouteNode[] (constant ++ permission-filtered async)
//!     → validation (names, catch-all position, patterns)
//!     → flatten into records, match order children-first
//!     → check redirect targets
//!     → Freeze as immutable RouteTable, swapped in whole
//!
//! Navigation:
//!     location
//!     → router.rs (match, chase redirects, catch-all)
//!     → views.rs (memoized lazy view loading)
//!     → engine.rs (commit if still the latest request)
//! ```
//!
//! # Design Decisions
//! - Tables are immutable; role changes build a new one
//! - Deterministic: same table and location always resolve the same way
//! - First match wins (children before parents, table order otherwise)

pub mod engine;
pub mod matcher;
pub mod menu;
pub mod node;
pub mod permission;
pub mod router;
pub mod views;

pub use engine::{Navigation, NavigationOutcome, RouterEngine, ScrollPosition};
pub use node::{ComponentRef, RedirectTarget, RouteMeta, RouteNode};
pub use permission::{filter_async_routes, PermissionFilter, Roles};
pub use router::{Resolution, ResolvedRoute, RouteStatus, RouteTable};
pub use views::{StaticViewLoader, ViewHandle, ViewLoader, ViewRegistry};
