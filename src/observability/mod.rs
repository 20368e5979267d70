//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Route table swaps, diagnostics, navigations, view loads
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (sequence, location, roles)
//! - Metrics are cheap facade calls; no exporter is installed by the crate

pub mod logging;
pub mod metrics;
