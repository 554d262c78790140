//! Prometheus metrics collection for glyphbot.
//!
//! - `bot_command_total{command}` - Commands executed by name
//! - `bot_command_duration_seconds{command}` - Command latency histogram
//! - `bot_command_errors_total{command,error}` - Failed commands by error code
//! - `bot_dispatch_outcomes_total{outcome}` - Terminal state of every dispatch
//! - `bot_error_reports_total` - Reports forwarded to the operator channel
//!
//! Recording before [`init`] is a no-op.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Command metrics
// ========================================================================

/// Commands executed by name.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command latency by name.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Command errors by name and error code.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Dispatch metrics
// ========================================================================

/// Dispatch outcomes, including the silent ones.
pub static DISPATCH_OUTCOMES: OnceLock<IntCounterVec> = OnceLock::new();

/// Error reports forwarded to the operator channel.
pub static ERROR_REPORTS: OnceLock<IntCounter> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Called once at startup. Calling it again is harmless.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("bot_command_total", "Commands executed by name"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("bot_command_duration_seconds", "Command latency by name")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("bot_command_errors_total", "Command errors by name and code"), &["command", "error"]));
    register!(DISPATCH_OUTCOMES, IntCounterVec::new(Opts::new("bot_dispatch_outcomes_total", "Dispatch outcomes"), &["outcome"]));
    register!(ERROR_REPORTS, IntCounter::new("bot_error_reports_total", "Error reports forwarded to the operator channel"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

#[inline]
pub fn record_outcome(outcome: &str) {
    if let Some(c) = DISPATCH_OUTCOMES.get() {
        c.with_label_values(&[outcome]).inc();
    }
}

#[inline]
pub fn record_error_report() {
    if let Some(c) = ERROR_REPORTS.get() {
        c.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_gather() {
        init();
        init();
        record_command("ping", 0.01);
        record_command_error("ping", "rejected");
        record_outcome("completed");
        let text = gather_metrics();
        assert!(text.contains("bot_command_total"));
        assert!(text.contains("bot_command_errors_total"));
    }
}
