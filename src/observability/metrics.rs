//! Metrics recording.
//!
//! # Metrics
//! - `netresponse_results_total` (counter): classified results by `variant`
//! - `netresponse_retries_total` (counter): attempts that ended in a network error and were retried
//! - `netresponse_bridge_cancellations_total` (counter): bridges cancelled before completion
//!
//! # Design Decisions
//! - Records through the `metrics` facade; installing an exporter is left to the host binary
//! - Without a recorder every call is a no-op

/// Count one classified result. `variant` is [`NetworkResult::kind`](crate::NetworkResult::kind).
pub fn record_result(variant: &'static str) {
    ::metrics::counter!("netresponse_results_total", "variant" => variant).increment(1);
}

pub fn record_retry() {
    ::metrics::counter!("netresponse_retries_total").increment(1);
}

pub fn record_cancellation() {
    ::metrics::counter!("netresponse_bridge_cancellations_total").increment(1);
}
