//! Metrics collection.
//!
//! # Metrics
//! - `storefront_renders_total` (counter): render calls by outcome
//! - `storefront_pages_written_total` (counter): documents written by export
//! - `storefront_navigation_faults_total` (counter): push/start faults
//! - `storefront_render_duration_seconds` (histogram): render latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op

use std::time::Instant;

pub fn record_render(outcome: &'static str, start: Instant) {
    metrics::counter!("storefront_renders_total", "outcome" => outcome).increment(1);
    metrics::histogram!("storefront_render_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_page_written() {
    metrics::counter!("storefront_pages_written_total").increment(1);
}

pub fn record_navigation_fault() {
    metrics::counter!("storefront_navigation_faults_total").increment(1);
}
