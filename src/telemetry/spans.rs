//! Spans for calls across the C boundary.

use std::time::Duration;

use tracing::{field, info_span, Span};

use crate::engine::AnnotatorError;

/// Outcome fields shared by every boundary span.
pub trait SpanExt {
    /// Record `status`, plus `error.kind` and `error.message` on failure.
    fn record_result<T>(&self, result: &Result<T, AnnotatorError>);

    /// Record `latency_ms`.
    fn record_latency(&self, latency: Duration);
}

impl SpanExt for Span {
    fn record_result<T>(&self, result: &Result<T, AnnotatorError>) {
        let err = match result {
            Ok(_) => {
                self.record("status", "ok");
                return;
            }
            Err(err) => err,
        };

        self.record("status", "error");
        let kind = if err.is_caller_error() {
            "caller"
        } else if err.is_load_failure() {
            "load"
        } else {
            "internal"
        };
        self.record("error.kind", kind);
        self.record("error.message", field::display(err));
    }

    fn record_latency(&self, latency: Duration) {
        self.record("latency_ms", latency.as_secs_f64() * 1000.0);
    }
}

/// Factory for `annotator_call` spans.
pub struct CallSpan;

impl CallSpan {
    /// One span per exported call. `handle` is 0 until one is known;
    /// `sentences` is only filled in by annotate calls.
    pub fn new(op: &'static str, handle: u64) -> Span {
        info_span!(
            "annotator_call",
            op,
            handle,
            status = field::Empty,
            error.kind = field::Empty,
            error.message = field::Empty,
            sentences = field::Empty,
            latency_ms = field::Empty,
        )
    }
}
