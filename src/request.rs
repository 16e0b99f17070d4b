use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};

/// Parameters for one load-test run.
///
/// Built once by the caller and handed to [`LoadTest::run`](crate::LoadTest::run);
/// the engine never mutates it. All durations are whole seconds and zero is
/// allowed; a zero-length phase simply records nothing.
///
/// # Example
/// ```rust
/// use brunt::LoadTestRequest;
///
/// let request = LoadTestRequest::builder()
///     .targets(vec![1, 2, 3])
///     .parallelism(10)
///     .warmup_secs(1)
///     .measurement_secs(2)
///     .build();
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct LoadTestRequest {
    /// Identifiers the workers pick from, uniformly at random.
    pub targets: Vec<u64>,
    /// Number of concurrent workers during the measurement phase.
    pub parallelism: usize,
    /// Length of the warmup phase in seconds.
    #[builder(default)]
    #[serde(default)]
    pub warmup_secs: u64,
    /// Idle gap between warmup and measurement in seconds.
    #[builder(default)]
    #[serde(default)]
    pub pause_secs: u64,
    /// Length of the measurement phase in seconds.
    #[builder(default)]
    #[serde(default)]
    pub measurement_secs: u64,
}

impl LoadTestRequest {
    /// Checks the constraints the engine refuses to run without: a non-empty
    /// target list and at least one worker.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::EmptyTargets);
        }
        if self.parallelism < 1 {
            return Err(Error::InvalidParallelism);
        }
        Ok(())
    }

    pub(crate) fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub(crate) fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }

    pub(crate) fn measurement(&self) -> Duration {
        Duration::from_secs(self.measurement_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(targets: Vec<u64>, parallelism: usize) -> LoadTestRequest {
        LoadTestRequest::builder()
            .targets(targets)
            .parallelism(parallelism)
            .build()
    }

    #[test]
    fn accepts_a_minimal_request() {
        assert!(request(vec![1], 1).validate().is_ok());
    }

    #[test]
    fn rejects_empty_targets() {
        let err = request(vec![], 4).validate().unwrap_err();
        assert!(matches!(err, Error::EmptyTargets));
    }

    #[test]
    fn rejects_zero_parallelism() {
        let err = request(vec![1, 2], 0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidParallelism));
    }

    #[test]
    fn durations_default_to_zero() {
        let req = request(vec![1], 1);
        assert_eq!(req.warmup(), Duration::ZERO);
        assert_eq!(req.pause(), Duration::ZERO);
        assert_eq!(req.measurement(), Duration::ZERO);
    }
}
