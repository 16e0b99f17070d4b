use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch::Receiver;
use tokio::time::{self, Instant};
use typed_builder::TypedBuilder;

use crate::client::TargetClient;
use crate::error::Error;
use crate::executor::phase::{PhaseContext, PhaseExecutor, shutdown_requested};
use crate::recorder::OutcomeRecorder;
use crate::report::{LoadTestReport, PhaseStats};
use crate::request::LoadTestRequest;

/// Orchestrates a full run: warmup, pause, then measurement.
///
/// A run moves through its phases in order. Warmup exercises the target with
/// a tenth of the requested parallelism so caches and connection pools fill
/// without skewing the real numbers; the optional pause lets the system
/// settle; the measurement phase then runs at full parallelism and produces
/// the figures that matter. Warmup statistics are reported separately rather
/// than mixed into the measurement.
///
/// The request is validated before any worker spawns, and every outcome folds
/// into the returned [`LoadTestReport`]: [`run`](LoadTest::run) never returns
/// `Err`. A failed run, whether rejected up front, interrupted by the
/// shutdown signal, or stuck past the grace period, reports `FAILED` with a
/// message and no statistics.
///
/// A `LoadTest` holds no per-run state and can drive any number of runs.
#[derive(TypedBuilder)]
pub struct LoadTest {
    /// Client used for every attempt of every phase.
    client: Arc<dyn TargetClient>,
    /// External stop signal, honored mid-phase and mid-pause.
    #[builder(default, setter(strip_option))]
    shutdown: Option<Receiver<bool>>,
    /// How long past a phase deadline in-flight attempts may keep running.
    #[builder(default = Duration::from_secs(60))]
    shutdown_grace: Duration,
}

impl LoadTest {
    /// Runs the test described by `request` and reports the outcome.
    pub async fn run(&self, request: LoadTestRequest) -> LoadTestReport {
        let started = Instant::now();
        tracing::info!(
            "Load test requested: {} targets, parallelism {}, warmup {}s, pause {}s, measurement {}s.",
            request.targets.len(),
            request.parallelism,
            request.warmup_secs,
            request.pause_secs,
            request.measurement_secs
        );

        if let Err(e) = request.validate() {
            tracing::warn!("Rejecting load test: {e}");
            return LoadTestReport::failed(e.to_string());
        }

        match self.drive(&request).await {
            Ok((warmup, measurement)) => {
                let total = started.elapsed();
                tracing::info!("Load test completed in {total:?}.");
                LoadTestReport::completed(warmup, measurement, total)
            }
            Err(e) => {
                tracing::error!("Load test failed: {e}");
                LoadTestReport::failed(e.to_string())
            }
        }
    }

    async fn drive(&self, request: &LoadTestRequest) -> Result<(PhaseStats, PhaseStats), Error> {
        let targets: Arc<[u64]> = Arc::from(request.targets.clone());

        let warmup = self
            .run_phase(
                "warmup",
                warmup_workers(request.parallelism),
                request.warmup(),
                &targets,
            )
            .await?;
        tracing::info!(
            "Warmup complete: {} requests, average latency {:?}.",
            warmup.total_requests,
            warmup.average_latency
        );

        if !request.pause().is_zero() {
            self.pause(request.pause()).await?;
        }

        let measurement = self
            .run_phase(
                "measurement",
                request.parallelism,
                request.measurement(),
                &targets,
            )
            .await?;
        tracing::info!(
            "Measurement complete: {} requests at {:.1} requests/second.",
            measurement.total_requests,
            measurement.requests_per_second
        );

        Ok((warmup, measurement))
    }

    /// Runs one phase on a fresh recorder and snapshots its statistics once
    /// the workers have drained.
    async fn run_phase(
        &self,
        name: &str,
        workers: usize,
        duration: Duration,
        targets: &Arc<[u64]>,
    ) -> Result<PhaseStats, Error> {
        let recorder = Arc::new(OutcomeRecorder::new());
        let executor = PhaseExecutor::builder()
            .name(name)
            .workers(workers)
            .duration(duration)
            .grace(self.shutdown_grace)
            .build();
        executor
            .exec(PhaseContext {
                targets: targets.clone(),
                client: self.client.clone(),
                recorder: recorder.clone(),
                shutdown: self.shutdown.clone(),
            })
            .await?;
        Ok(recorder.stats())
    }

    async fn pause(&self, duration: Duration) -> Result<(), Error> {
        tracing::info!("Pausing for {duration:?} before measurement.");
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            _ = time::sleep(duration) => Ok(()),
            _ = shutdown_requested(&mut shutdown) => Err(Error::Interrupted {
                phase: "pause".to_string(),
            }),
        }
    }
}

/// A tenth of the measurement parallelism, with a floor of one worker.
pub(crate) fn warmup_workers(parallelism: usize) -> usize {
    (parallelism / 10).max(1)
}
