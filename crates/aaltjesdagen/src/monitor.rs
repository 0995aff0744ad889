//! Keyed stopwatch for timing build operations.
use std::time::{Duration, Instant};

use log::{info, warn};
use rustc_hash::FxHashMap;
use std::sync::Mutex;

use crate::logging::format_duration;

/// Measures named units of work during a build.
///
/// Marks are keyed by label: `start` records a timestamp, `end` consumes it.
/// Starting the same label twice overwrites the earlier mark, there is no
/// stacking. A monitor may be shared between concurrent callers as long as
/// each caller uses its own labels; reusing a label across overlapping
/// operations is the caller's race to avoid.
#[derive(Default)]
pub struct PerformanceMonitor {
    marks: Mutex<FxHashMap<String, Instant>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing an operation, replacing any unclosed mark for `label`.
    pub fn start(&self, label: &str) {
        self.marks_mut().insert(label.to_string(), Instant::now());
    }

    /// Ends timing, logs the duration and returns it.
    ///
    /// Ending a label that was never started (or was already ended) logs a
    /// warning and returns `None` rather than failing the build.
    pub fn end(&self, label: &str) -> Option<Duration> {
        self.finish(label, false)
    }

    /// Measures an async unit of work.
    ///
    /// The mark is ended on both outcomes; a failure is flagged in the log
    /// and the original error is returned untouched.
    pub async fn measure<T, E, Fut>(
        &self,
        label: &str,
        operation: impl FnOnce() -> Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        self.start(label);
        match operation().await {
            Ok(value) => {
                self.finish(label, false);
                Ok(value)
            }
            Err(error) => {
                self.finish(label, true);
                Err(error)
            }
        }
    }

    /// Synchronous analogue of [`measure`](Self::measure).
    pub fn measure_sync<T, E>(
        &self,
        label: &str,
        operation: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.start(label);
        match operation() {
            Ok(value) => {
                self.finish(label, false);
                Ok(value)
            }
            Err(error) => {
                self.finish(label, true);
                Err(error)
            }
        }
    }

    fn finish(&self, label: &str, failed: bool) -> Option<Duration> {
        let start = self.marks_mut().remove(label);

        let Some(start) = start else {
            warn!(target: "perf", "Performance mark \"{}\" not found", label);
            return None;
        };

        let duration = start.elapsed();
        if failed {
            info!(target: "perf", "{} {} (failed)", label, format_duration(duration));
        } else {
            info!(target: "perf", "{} {}", label, format_duration(duration));
        }

        Some(duration)
    }

    fn marks_mut(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, Instant>> {
        self.marks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_elapsed_time_between_start_and_end() {
        let monitor = PerformanceMonitor::new();
        monitor.start("op");
        std::thread::sleep(Duration::from_millis(5));

        let duration = monitor.end("op").unwrap();
        assert!(duration >= Duration::from_millis(5));
    }

    #[test]
    fn ending_an_unknown_label_yields_none() {
        let monitor = PerformanceMonitor::new();
        assert!(monitor.end("never-started").is_none());
    }

    #[test]
    fn marks_are_consumed_by_end() {
        let monitor = PerformanceMonitor::new();
        monitor.start("once");
        assert!(monitor.end("once").is_some());
        assert!(monitor.end("once").is_none());
    }

    #[test]
    fn restarting_a_label_overwrites_the_earlier_mark() {
        let monitor = PerformanceMonitor::new();
        monitor.start("op");
        monitor.start("op");

        assert!(monitor.end("op").is_some());
        // Only one mark existed, the second start replaced the first.
        assert!(monitor.end("op").is_none());
    }

    #[tokio::test]
    async fn measure_returns_the_operation_result() {
        let monitor = PerformanceMonitor::new();

        let result: Result<&str, &str> = monitor.measure("async-op", || async { Ok("done") }).await;
        assert_eq!(result, Ok("done"));

        // The mark was consumed on success.
        assert!(monitor.end("async-op").is_none());
    }

    #[tokio::test]
    async fn measure_reraises_failures_and_consumes_the_mark() {
        let monitor = PerformanceMonitor::new();

        let result: Result<(), &str> = monitor.measure("failing-op", || async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert!(monitor.end("failing-op").is_none());
    }

    #[test]
    fn measure_sync_mirrors_the_async_behavior() {
        let monitor = PerformanceMonitor::new();

        let sum: Result<i32, &str> = monitor.measure_sync("sum", || Ok((0..1000).sum()));
        assert_eq!(sum, Ok(499500));

        let failure: Result<(), &str> = monitor.measure_sync("broken", || Err("sync error"));
        assert_eq!(failure, Err("sync error"));
        assert!(monitor.end("broken").is_none());
    }
}
