//! Metrics collection.
//!
//! # Metrics
//! - `route_navigations_total` (counter): navigations by outcome
//! - `route_navigation_duration_seconds` (histogram): resolve + view load time
//! - `route_view_loads_total` (counter): view registry hits, loads, failures
//! - `route_table_records` (gauge): records in the live table

use std::time::Instant;

pub fn record_navigation(outcome: &'static str, started: Instant) {
    metrics::counter!("route_navigations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("route_navigation_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_view_load(result: &'static str) {
    metrics::counter!("route_view_loads_total", "result" => result).increment(1);
}

pub fn record_table_swap(records: usize) {
    metrics::gauge!("route_table_records").set(records as f64);
    metrics::counter!("route_table_swaps_total").increment(1);
}
