use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch::Receiver;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{self, Instant};
use typed_builder::TypedBuilder;

use crate::client::TargetClient;
use crate::error::Error;
use crate::recorder::OutcomeRecorder;
use internals::*;

/// Shared state handed to every worker of a phase.
#[derive(Clone)]
pub struct PhaseContext {
    /// Identifiers the workers sample from, uniformly at random.
    /// Must be non-empty.
    pub targets: Arc<[u64]>,
    /// Client invoked once per attempt.
    pub client: Arc<dyn TargetClient>,
    /// Sink for attempt outcomes.
    pub recorder: Arc<OutcomeRecorder>,
    /// External stop signal. `None` makes the phase uninterruptible.
    pub shutdown: Option<Receiver<bool>>,
}

/// Runs one phase: a fixed set of workers hammering the target until a
/// deadline.
///
/// Workers check the deadline between attempts, so an attempt that starts
/// just before the deadline still runs to completion and is recorded. After
/// the deadline the executor waits up to `grace` for those in-flight attempts
/// to drain; workers still running past that are aborted and the phase fails.
#[derive(TypedBuilder)]
pub struct PhaseExecutor {
    /// Label used in logs and error messages, e.g. `"warmup"`.
    #[builder(setter(into))]
    pub name: String,
    /// The number of concurrent worker tasks to spawn.
    pub workers: usize,
    /// Nominal length of the phase. Zero spawns workers that exit at once.
    pub duration: Duration,
    /// How long past the deadline in-flight attempts may keep running.
    #[builder(default = Duration::from_secs(60))]
    pub grace: Duration,
}

impl PhaseExecutor {
    /// Executes the phase and joins all workers.
    ///
    /// Outcomes land in `ctx.recorder` as they happen; this returns only
    /// whether the phase itself ran to completion. A worker panic is logged
    /// and does not fail the phase, so the outcomes the other workers
    /// recorded survive.
    ///
    /// # Errors
    /// [`Error::Interrupted`] when the shutdown signal fires before the
    /// workers have drained, [`Error::GraceExceeded`] when workers are still
    /// running `grace` after the deadline. Both paths abort the remaining
    /// workers before returning.
    pub async fn exec(&self, ctx: PhaseContext) -> Result<(), Error> {
        let deadline = Instant::now() + self.duration;
        tracing::info!(
            "Starting {} phase: {} workers for {:?}.",
            self.name,
            self.workers,
            self.duration
        );

        let mut shutdown = ctx.shutdown.clone();
        let handles = spawn_workers(&ctx, self.workers, deadline);
        let aborts: Vec<AbortHandle> = handles.iter().map(|h| h.abort_handle()).collect();

        tokio::select! {
            joined = time::timeout_at(deadline + self.grace, join_all(handles)) => match joined {
                Ok(results) => {
                    for result in results {
                        if let Err(e) = result {
                            tracing::error!("Worker panicked: {e}");
                        }
                    }
                    tracing::info!("Finished {} phase.", self.name);
                    Ok(())
                }
                Err(_) => {
                    tracing::warn!("Aborting {} workers still running past the grace period.", self.name);
                    abort_all(&aborts);
                    Err(Error::GraceExceeded {
                        phase: self.name.clone(),
                        grace: self.grace,
                    })
                }
            },
            _ = shutdown_requested(&mut shutdown) => {
                tracing::warn!("Shutdown requested, aborting {} phase.", self.name);
                abort_all(&aborts);
                Err(Error::Interrupted {
                    phase: self.name.clone(),
                })
            }
        }
    }
}

/// Resolves when the signal flips to `true`; pends forever when there is no
/// signal or its sender is gone.
pub(crate) async fn shutdown_requested(shutdown: &mut Option<Receiver<bool>>) {
    match shutdown {
        Some(receiver) => {
            if receiver.wait_for(|stop| *stop).await.is_err() {
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(feature = "internals")]
pub use internals::*;

/// Internal components of the `PhaseExecutor`.
/// Encapsulated in a module to allow conditional exposure via `#[cfg(feature = "internals")]`.
mod internals {
    use super::*;

    /// Spawns `workers` Tokio tasks, each running the attempt loop until
    /// `deadline`.
    pub fn spawn_workers(
        ctx: &PhaseContext,
        workers: usize,
        deadline: Instant,
    ) -> Vec<JoinHandle<()>> {
        (0..workers)
            .map(|i| {
                let ctx = ctx.clone();
                tokio::spawn(worker_loop(i, ctx, deadline))
            })
            .collect()
    }

    /// The attempt loop of a single worker: pick a random target, call the
    /// client, record the outcome, repeat while the deadline has not passed.
    pub async fn worker_loop(worker: usize, ctx: PhaseContext, deadline: Instant) {
        tracing::debug!("Worker {worker} spawned.");
        while Instant::now() < deadline {
            let target = ctx.targets[fastrand::usize(..ctx.targets.len())];
            let start = Instant::now();
            match ctx.client.fetch(target).await {
                Ok(()) => ctx.recorder.record_success(start.elapsed()),
                Err(e) => {
                    tracing::debug!("Request to target {target} failed: {e}");
                    ctx.recorder.record_failure();
                }
            }
        }
        tracing::debug!("Worker {worker} finished.");
    }

    /// Aborts every worker that has not finished yet.
    pub fn abort_all(handles: &[AbortHandle]) {
        for handle in handles {
            handle.abort();
        }
    }
}
