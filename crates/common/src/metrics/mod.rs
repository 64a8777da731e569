//! Metrics and observability utilities
//!
//! Emits through the `metrics` facade; without an installed recorder every
//! call is a no-op, so library code records unconditionally.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all MentionLink metrics
pub const METRICS_PREFIX: &str = "mentionlink";

/// Buckets for local store lookups (in seconds)
pub const LOOKUP_BUCKETS: &[f64] = &[
    0.00001, // 10us
    0.00005, // 50us
    0.0001,  // 100us
    0.0005,  // 500us
    0.001,   // 1ms
    0.005,   // 5ms
    0.010,   // 10ms
    0.050,   // 50ms
    0.100,   // 100ms
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Store metrics
    describe_counter!(
        format!("{}_store_lookups_total", METRICS_PREFIX),
        Unit::Count,
        "Total lookup store queries"
    );

    describe_histogram!(
        format!("{}_store_lookup_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Lookup store query latency in seconds"
    );

    // Cache metrics
    describe_counter!(
        format!("{}_cache_hits_total", METRICS_PREFIX),
        Unit::Count,
        "Total memo cache hits"
    );

    describe_counter!(
        format!("{}_cache_misses_total", METRICS_PREFIX),
        Unit::Count,
        "Total memo cache misses"
    );

    // Resolver metrics
    describe_counter!(
        format!("{}_normalizations_total", METRICS_PREFIX),
        Unit::Count,
        "Mention normalizations by resolution branch"
    );

    describe_counter!(
        format!("{}_contexts_extracted_total", METRICS_PREFIX),
        Unit::Count,
        "Total context windows extracted"
    );

    tracing::info!("Metrics registered");
}

/// Times a single store lookup
pub struct LookupTimer {
    start: Instant,
    kind: &'static str,
}

impl LookupTimer {
    /// Start timing a lookup of the given kind (freq, lower, candidates)
    pub fn start(kind: &'static str) -> Self {
        Self {
            start: Instant::now(),
            kind,
        }
    }

    /// Record lookup completion
    pub fn finish(self, hit: bool) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_store_lookups_total", METRICS_PREFIX),
            "kind" => self.kind,
            "hit" => if hit { "true" } else { "false" }
        )
        .increment(1);

        histogram!(
            format!("{}_store_lookup_duration_seconds", METRICS_PREFIX),
            "kind" => self.kind
        )
        .record(duration);
    }
}

/// Helper to record cache metrics
pub fn record_cache(hit: bool, cache_name: &str) {
    if hit {
        counter!(
            format!("{}_cache_hits_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_cache_misses_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    }
}

/// Helper to record which normalization branch produced a mention
pub fn record_normalization(branch: &'static str) {
    counter!(
        format!("{}_normalizations_total", METRICS_PREFIX),
        "branch" => branch
    )
    .increment(1);
}

/// Helper to record context extraction
pub fn record_context(left_words: usize, right_words: usize) {
    counter!(format!("{}_contexts_extracted_total", METRICS_PREFIX)).increment(1);

    tracing::trace!(left_words, right_words, "Context extracted");
}
