use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::report::PhaseStats;

/// Shared accumulator for request outcomes within a phase.
///
/// Workers call [`record_success`](OutcomeRecorder::record_success) and
/// [`record_failure`](OutcomeRecorder::record_failure) concurrently through a
/// shared reference; a mutex guards the interior and each call holds it only
/// long enough to push one value. The phase clock starts at construction (or
/// the last [`reset`](OutcomeRecorder::reset)) and stops when
/// [`stats`](OutcomeRecorder::stats) is taken, so snapshot the recorder right
/// after the workers have joined.
#[derive(Debug)]
pub struct OutcomeRecorder {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    latencies: Vec<Duration>,
    failures: u64,
    started: Instant,
}

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                latencies: Vec::new(),
                failures: 0,
                started: Instant::now(),
            }),
        }
    }

    /// Discards everything recorded so far and restarts the phase clock.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.latencies.clear();
        inner.failures = 0;
        inner.started = Instant::now();
    }

    /// Records one successful attempt and the latency it took.
    pub fn record_success(&self, latency: Duration) {
        self.lock().latencies.push(latency);
    }

    /// Records one failed attempt. Failures carry no latency.
    pub fn record_failure(&self) {
        self.lock().failures += 1;
    }

    /// Snapshots the phase statistics accumulated since the last reset.
    ///
    /// Latency aggregates cover successes only. With no successes the
    /// min/average/max come back as [`Duration::ZERO`], and a zero-length
    /// phase reports a throughput of `0.0` rather than dividing by zero.
    pub fn stats(&self) -> PhaseStats {
        let inner = self.lock();
        let duration = inner.started.elapsed();
        let successes = inner.latencies.len() as u64;

        let (min, max, total) = inner.latencies.iter().fold(
            (Duration::MAX, Duration::ZERO, Duration::ZERO),
            |(min, max, total), &latency| (min.min(latency), max.max(latency), total + latency),
        );
        let (min_latency, max_latency, average_latency) = if successes == 0 {
            (Duration::ZERO, Duration::ZERO, Duration::ZERO)
        } else {
            (min, max, total.div_f64(successes as f64))
        };

        let requests_per_second = if duration.is_zero() {
            0.0
        } else {
            successes as f64 / duration.as_secs_f64()
        };

        PhaseStats {
            total_requests: successes + inner.failures,
            successful_requests: successes,
            failed_requests: inner.failures,
            average_latency,
            min_latency,
            max_latency,
            duration,
            requests_per_second,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("recorder mutex poisoned")
    }
}

impl Default for OutcomeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_recorder_reports_zeroes() {
        let stats = OutcomeRecorder::new().stats();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.successful_requests, 0);
        assert_eq!(stats.failed_requests, 0);
        assert_eq!(stats.average_latency, Duration::ZERO);
        assert_eq!(stats.min_latency, Duration::ZERO);
        assert_eq!(stats.max_latency, Duration::ZERO);
    }

    #[test]
    fn counts_successes_and_failures_separately() {
        let recorder = OutcomeRecorder::new();
        recorder.record_success(Duration::from_millis(5));
        recorder.record_success(Duration::from_millis(7));
        recorder.record_failure();
        let stats = recorder.stats();
        assert_eq!(stats.successful_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.total_requests, 3);
    }

    #[test]
    fn latency_aggregates_track_successes_only() {
        let recorder = OutcomeRecorder::new();
        for ms in [10, 20, 30] {
            recorder.record_success(Duration::from_millis(ms));
        }
        recorder.record_failure();
        let stats = recorder.stats();
        assert_eq!(stats.min_latency, Duration::from_millis(10));
        assert_eq!(stats.max_latency, Duration::from_millis(30));
        assert_eq!(stats.average_latency, Duration::from_millis(20));
    }

    #[test]
    fn reset_clears_previous_phase() {
        let recorder = OutcomeRecorder::new();
        recorder.record_success(Duration::from_millis(50));
        recorder.record_failure();
        recorder.reset();
        let stats = recorder.stats();
        assert_eq!(stats.successful_requests, 0);
        assert_eq!(stats.failed_requests, 0);
        assert_eq!(stats.max_latency, Duration::ZERO);
    }

    #[test]
    fn concurrent_recording_drops_nothing() {
        let recorder = OutcomeRecorder::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..250 {
                        recorder.record_success(Duration::from_millis(1));
                        recorder.record_failure();
                    }
                });
            }
        });
        let stats = recorder.stats();
        assert_eq!(stats.successful_requests, 2000);
        assert_eq!(stats.failed_requests, 2000);
        assert_eq!(stats.total_requests, 4000);
    }

    #[tokio::test(start_paused = true)]
    async fn throughput_divides_successes_by_elapsed_time() {
        let recorder = OutcomeRecorder::new();
        for _ in 0..100 {
            recorder.record_success(Duration::from_millis(1));
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
        let stats = recorder.stats();
        assert_eq!(stats.duration, Duration::from_secs(2));
        assert_eq!(stats.requests_per_second, 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_length_phase_has_zero_throughput() {
        let recorder = OutcomeRecorder::new();
        recorder.record_success(Duration::from_millis(1));
        let stats = recorder.stats();
        assert_eq!(stats.duration, Duration::ZERO);
        assert_eq!(stats.requests_per_second, 0.0);
    }
}
