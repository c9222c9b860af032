use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Metric names recorded by the store and the form handlers
///
/// Nothing is exported unless the host process installs a `metrics`
/// recorder; without one every call is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    // Store metrics
    pub store_operations_total: &'static str,
    pub store_operation_duration: &'static str,
    pub store_rows: &'static str,

    // Form metrics
    pub submissions_total: &'static str,
    pub points_summed: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            store_operations_total: "loyalty_store_operations_total",
            store_operation_duration: "loyalty_store_operation_duration_seconds",
            store_rows: "loyalty_store_rows",

            submissions_total: "loyalty_form_submissions_total",
            points_summed: "loyalty_points_summed",

            errors_total: "loyalty_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record store operation metrics
    pub fn record_store_operation(&self, operation: &'static str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };

        counter!(self.store_operations_total, "operation" => operation, "status" => status).increment(1);
        histogram!(self.store_operation_duration, "operation" => operation).record(duration.as_secs_f64());

        if !success {
            counter!(self.errors_total, "type" => "storage", "operation" => operation).increment(1);
        }
    }

    /// Record the row count seen by the last full-table query
    pub fn update_store_rows(&self, rows: usize) {
        #[allow(clippy::cast_precision_loss)]
        let rows = rows as f64;
        gauge!(self.store_rows).set(rows);
    }

    /// Record a form submission and whether it was accepted
    pub fn record_submission(&self, form: &'static str, accepted: bool) {
        let outcome = if accepted { "accepted" } else { "rejected" };
        counter!(self.submissions_total, "form" => form, "outcome" => outcome).increment(1);
    }

    /// Record the total produced by a points summation
    pub fn record_points_summed(&self, total: i64) {
        #[allow(clippy::cast_precision_loss)]
        let total = total as f64;
        histogram!(self.points_summed).record(total);
    }
}

/// Performance timing wrapper for store metrics
pub struct MetricsTimer {
    collector: MetricsCollector,
    operation: &'static str,
    start: Instant,
}

impl MetricsTimer {
    #[must_use]
    pub fn new(collector: MetricsCollector, operation: &'static str) -> Self {
        Self {
            collector,
            operation,
            start: Instant::now(),
        }
    }

    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed();
        self.collector.record_store_operation(self.operation, duration, success);
    }
}
