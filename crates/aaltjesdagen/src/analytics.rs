//! Build-run analytics and error accounting.
//!
//! One [`BuildReporter`] is constructed at the start of a generation run,
//! threaded through the pipeline, and summarized once the run finishes.
//! Nothing here persists across runs.
use std::fmt::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use colored::Colorize;
use log::{error, info};

use crate::logging::{format_duration, print_title};

// `log` has no success level, build summaries use info with a green check.
macro_rules! success_target {
    ($target:expr, $($arg:tt)+) => {
        info!(target: $target, "{} {}", "✓".green(), format!($($arg)+))
    };
}

/// One completed, named operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationMetric {
    pub name: String,
    pub duration: Duration,
    /// Item count for batch operations, e.g. the number of stories fetched.
    pub count: Option<usize>,
}

/// Collects per-operation timings for one build run.
///
/// Tracking is atomic per call: each `track` takes the lock once. Re-tracking
/// an operation name overwrites its duration and count but keeps the position
/// of the first `track` call, so the summary reads in pipeline order.
pub struct BuildAnalytics {
    metrics: Mutex<Vec<OperationMetric>>,
    started_at: Instant,
}

impl Default for BuildAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildAnalytics {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(Vec::new()),
            started_at: Instant::now(),
        }
    }

    pub fn track(&self, operation: &str, duration: Duration, count: Option<usize>) {
        let mut metrics = lock(&self.metrics);

        match metrics.iter_mut().find(|metric| metric.name == operation) {
            Some(existing) => {
                existing.duration = duration;
                existing.count = count;
            }
            None => metrics.push(OperationMetric {
                name: operation.to_string(),
                duration,
                count,
            }),
        }
    }

    /// All tracked metrics, in first-track order.
    pub fn metrics(&self) -> Vec<OperationMetric> {
        lock(&self.metrics).clone()
    }

    /// Time elapsed since this tracker was created.
    pub fn total_time(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Renders the metrics block shown at the end of a build.
    pub fn render_summary(&self) -> String {
        let metrics = lock(&self.metrics);

        let mut summary = String::new();
        for metric in metrics.iter() {
            let _ = write!(summary, "  {}: {}ms", metric.name, metric.duration.as_millis());
            if let Some(count) = metric.count {
                let _ = write!(summary, " ({} items)", count);
            }
            summary.push('\n');
        }

        let _ = write!(
            summary,
            "\n  Total build time: {}ms",
            self.total_time().as_millis()
        );
        summary
    }

    pub fn summarize(&self) {
        print_title("build performance summary");
        for line in self.render_summary().lines() {
            info!(target: "SKIP_FORMAT", "{}", line);
        }
    }
}

/// One captured failure.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
    pub message: String,
    /// Key-value context, always carrying the source error's message under
    /// the `error` key.
    pub context: Vec<(String, String)>,
    pub timestamp: DateTime<Utc>,
}

/// Accumulates every failure captured during one build run.
///
/// Records are only ever appended; the sequence grows for the lifetime of
/// the run and is rendered once at the end.
#[derive(Default)]
pub struct ErrorTracker {
    errors: Mutex<Vec<ErrorRecord>>,
}

impl ErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, message: &str, error: &dyn std::error::Error, context: &[(&str, &str)]) {
        let mut full_context = vec![("error".to_string(), error.to_string())];
        full_context.extend(
            context
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );

        lock(&self.errors).push(ErrorRecord {
            message: message.to_string(),
            context: full_context,
            timestamp: Utc::now(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !lock(&self.errors).is_empty()
    }

    pub fn len(&self) -> usize {
        lock(&self.errors).len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    pub fn records(&self) -> Vec<ErrorRecord> {
        lock(&self.errors).clone()
    }

    /// Renders a numbered list of every captured error, or a success line.
    pub fn render_summary(&self) -> String {
        let errors = lock(&self.errors);

        if errors.is_empty() {
            return "No errors during build!".to_string();
        }

        let mut summary = String::new();
        for (index, record) in errors.iter().enumerate() {
            let context = record
                .context
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(", ");

            if index > 0 {
                summary.push('\n');
            }
            let _ = write!(
                summary,
                "  {}. {}\n     Context: {}",
                index + 1,
                record.message,
                context
            );
        }
        summary
    }

    pub fn summarize(&self) {
        if !self.has_errors() {
            success_target!("build", "{}", self.render_summary());
            return;
        }

        print_title("build errors summary");
        for line in self.render_summary().lines() {
            info!(target: "SKIP_FORMAT", "{}", line.red().to_string());
        }
    }
}

/// The explicit per-run context object handed to everything that reports.
///
/// Groups the analytics and error trackers so callers thread a single
/// reference through the pipeline instead of two globals.
#[derive(Default)]
pub struct BuildReporter {
    pub analytics: BuildAnalytics,
    pub errors: ErrorTracker,
}

impl BuildReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks and logs a completed build operation.
    pub fn metric(&self, operation: &str, duration: Duration, count: Option<usize>) {
        self.analytics.track(operation, duration, count);

        match count {
            Some(count) => success_target!(
                "build",
                "{} {} ({} items)",
                operation,
                format_duration(duration),
                count
            ),
            None => success_target!("build", "{} {}", operation, format_duration(duration)),
        }
    }

    /// Tracks and logs a failure with its context.
    pub fn error(&self, message: &str, source: &dyn std::error::Error, context: &[(&str, &str)]) {
        self.errors.track(message, source, context);
        error!(target: "build", "{} ({})", message, source);
    }

    /// Prints the end-of-run metrics and error blocks.
    pub fn summarize(&self) {
        self.analytics.summarize();
        self.errors.summarize();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn tracks_operations_with_durations() {
        let analytics = BuildAnalytics::new();
        analytics.track("test-op", Duration::from_millis(100), None);

        let metrics = analytics.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "test-op");
        assert_eq!(metrics[0].duration, Duration::from_millis(100));
        assert_eq!(metrics[0].count, None);
    }

    #[test]
    fn tracks_operations_with_counts() {
        let analytics = BuildAnalytics::new();
        analytics.track("items-processed", Duration::from_millis(50), Some(10));

        assert_eq!(analytics.metrics()[0].count, Some(10));
    }

    #[test]
    fn retracking_overwrites_but_keeps_position() {
        let analytics = BuildAnalytics::new();
        analytics.track("a", Duration::from_millis(10), None);
        analytics.track("b", Duration::from_millis(5), None);
        analytics.track("a", Duration::from_millis(20), Some(3));

        let metrics = analytics.metrics();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "a");
        assert_eq!(metrics[0].duration, Duration::from_millis(20));
        assert_eq!(metrics[0].count, Some(3));
        assert_eq!(metrics[1].name, "b");
    }

    #[test]
    fn total_time_grows_from_construction() {
        let analytics = BuildAnalytics::new();
        assert!(analytics.total_time() >= Duration::ZERO);
    }

    #[test]
    fn summary_lists_metrics_and_total_time() {
        let analytics = BuildAnalytics::new();
        analytics.track("fetch:home", Duration::from_millis(12), None);
        analytics.track("stories", Duration::from_millis(80), Some(24));

        let summary = analytics.render_summary();
        assert!(summary.contains("fetch:home: 12ms"));
        assert!(summary.contains("stories: 80ms (24 items)"));
        assert!(summary.contains("Total build time:"));
    }

    #[test]
    fn fresh_tracker_has_no_errors() {
        let tracker = ErrorTracker::new();
        assert!(!tracker.has_errors());
        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.render_summary(), "No errors during build!");
    }

    #[test]
    fn tracked_errors_accumulate() {
        let tracker = ErrorTracker::new();
        let error = io::Error::other("connection reset");

        tracker.track("Failed to fetch story", &error, &[("slug", "home")]);
        tracker.track("Failed to fetch story", &error, &[("slug", "contact")]);

        assert!(tracker.has_errors());
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn error_context_includes_the_source_message() {
        let tracker = ErrorTracker::new();
        let error = io::Error::other("connection reset");
        tracker.track("Failed to fetch story", &error, &[("version", "draft")]);

        let records = tracker.records();
        assert_eq!(
            records[0].context[0],
            ("error".to_string(), "connection reset".to_string())
        );
        assert!(
            records[0]
                .context
                .contains(&("version".to_string(), "draft".to_string()))
        );
    }

    #[test]
    fn error_summary_is_a_numbered_list() {
        let tracker = ErrorTracker::new();
        let error = io::Error::other("boom");
        tracker.track("First failure", &error, &[]);
        tracker.track("Second failure", &error, &[]);

        let summary = tracker.render_summary();
        assert!(summary.contains("1. First failure"));
        assert!(summary.contains("2. Second failure"));
        assert!(summary.contains("Context: error=boom"));
    }

    #[test]
    fn reporter_routes_to_both_trackers() {
        let reporter = BuildReporter::new();
        reporter.metric("pages", Duration::from_millis(30), Some(8));

        let error = io::Error::other("boom");
        reporter.error("Fetch failed", &error, &[("slug", "home")]);

        assert_eq!(reporter.analytics.metrics().len(), 1);
        assert_eq!(reporter.errors.len(), 1);
    }
}
