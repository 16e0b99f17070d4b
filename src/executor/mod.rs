//! Executor: deadline-bounded concurrent execution of a single phase.
//!
//! A phase is the unit of load generation. [`PhaseExecutor`] spawns a fixed
//! number of workers, each of which loops "pick a random target, call the
//! client, record the outcome" until the phase deadline passes. The deadline
//! is checked between attempts, never mid-flight: an attempt that starts
//! before the deadline runs to completion and is still recorded, so a phase
//! can overshoot its nominal duration by up to one request latency.
//!
//! After the deadline the executor waits for the workers to drain. A grace
//! period bounds that wait; workers still running when it expires are aborted
//! and the phase fails. An external shutdown signal interrupts the phase the
//! same way, mid-deadline.
//!
//! Outcomes land in an [`OutcomeRecorder`](crate::OutcomeRecorder) shared
//! through the [`PhaseContext`]; the executor itself never aggregates. The
//! orchestration above it lives in [`LoadTest`](crate::LoadTest).
pub mod phase;
pub use phase::{PhaseContext, PhaseExecutor};
