//! Metrics collection.
//!
//! # Metrics
//! - `authz_refresh_total` (counter): refreshes by outcome (ok, failed, timeout, stale)
//! - `authz_refresh_duration_seconds` (histogram): joined fetch latency
//! - `authz_catalog_matchers` (gauge): compiled pattern count
//! - `authz_catalog_exact_paths` (gauge): exact table size
//! - `authz_catalog_rejections` (gauge): skipped entries/templates in the last catalog
//!
//! # Design Decisions
//! - Emitted through the `metrics` facade; the host installs the recorder
//! - Decision functions are not instrumented (they stay side-effect free)

use std::time::Instant;

pub fn record_refresh(outcome: &'static str, start: Instant) {
    metrics::counter!("authz_refresh_total", "outcome" => outcome).increment(1);
    metrics::histogram!("authz_refresh_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_catalog(exact_paths: usize, matchers: usize, rejections: usize) {
    metrics::gauge!("authz_catalog_exact_paths").set(exact_paths as f64);
    metrics::gauge!("authz_catalog_matchers").set(matchers as f64);
    metrics::gauge!("authz_catalog_rejections").set(rejections as f64);
}
