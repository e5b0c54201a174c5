//! Metrics emitted through the `metrics` facade.
//!
//! The crate installs no recorder; a host that wants these values
//! installs one of its own.

use std::time::Duration;

pub const MODELS_LOADED: &str = "annotator_models_loaded_total";
pub const MODELS_FREED: &str = "annotator_models_freed_total";
pub const MODELS_LIVE: &str = "annotator_models_live";
pub const ANNOTATE_TOTAL: &str = "annotator_annotate_total";
pub const ANNOTATE_FAILURES: &str = "annotator_annotate_failures_total";
pub const ANNOTATE_LATENCY_MS: &str = "annotator_annotate_latency_ms";
pub const PANICS: &str = "annotator_panics_total";

pub fn record_model_loaded(live: usize) {
    metrics::counter!(MODELS_LOADED).increment(1);
    metrics::gauge!(MODELS_LIVE).set(live as f64);
}

pub fn record_model_freed(live: usize) {
    metrics::counter!(MODELS_FREED).increment(1);
    metrics::gauge!(MODELS_LIVE).set(live as f64);
}

pub fn record_annotate_success(sentences: usize, latency: Duration) {
    metrics::counter!(ANNOTATE_TOTAL).increment(1);
    metrics::histogram!(ANNOTATE_LATENCY_MS).record(latency.as_secs_f64() * 1000.0);
    tracing::trace!(sentences, "annotate metrics recorded");
}

pub fn record_annotate_failure(code: i32) {
    metrics::counter!(ANNOTATE_TOTAL).increment(1);
    metrics::counter!(ANNOTATE_FAILURES, "code" => code.to_string()).increment(1);
}

pub fn record_panic(op: &'static str) {
    metrics::counter!(PANICS, "op" => op).increment(1);
}
