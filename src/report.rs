use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Statistics accumulated over a single phase.
///
/// Latency figures cover successful attempts only; failed attempts count
/// toward `failed_requests` and nothing else. An empty phase reports zero
/// everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_latency: Duration,
    pub min_latency: Duration,
    pub max_latency: Duration,
    /// Wall-clock length of the phase as observed by the recorder.
    pub duration: Duration,
    /// Successful attempts per second over `duration`, `0.0` when the
    /// phase had no length.
    pub requests_per_second: f64,
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Completed,
    Failed,
}

/// Final outcome of [`LoadTest::run`](crate::LoadTest::run).
///
/// A failed run carries only its status and message; the phase statistics
/// and total duration stay `None` because a partial measurement would be
/// misleading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTestReport {
    pub status: TestStatus,
    pub message: String,
    pub warmup: Option<PhaseStats>,
    pub measurement: Option<PhaseStats>,
    pub total_duration: Option<Duration>,
}

impl LoadTestReport {
    pub(crate) fn completed(
        warmup: PhaseStats,
        measurement: PhaseStats,
        total_duration: Duration,
    ) -> Self {
        Self {
            status: TestStatus::Completed,
            message: "load test completed successfully".to_string(),
            warmup: Some(warmup),
            measurement: Some(measurement),
            total_duration: Some(total_duration),
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            message: message.into(),
            warmup: None,
            measurement: None,
            total_duration: None,
        }
    }
}
