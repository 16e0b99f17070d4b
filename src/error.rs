use std::time::Duration;

use thiserror::Error;

/// Result type alias for load-test operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that reject a request up front or stop a running test.
///
/// Per-request failures are deliberately absent here: a failed attempt is
/// recorded into the phase statistics and the worker moves on. Only
/// validation and whole-test interruptions surface as errors, and
/// [`LoadTest::run`](crate::LoadTest::run) folds even those into the final
/// report rather than returning them.
#[derive(Debug, Error)]
pub enum Error {
    /// The request carried no target identifiers.
    #[error("target id list cannot be empty")]
    EmptyTargets,

    /// The request asked for fewer than one worker.
    #[error("parallelism must be at least 1")]
    InvalidParallelism,

    /// A shutdown signal arrived while the named phase (or the inter-phase
    /// pause) was still running.
    #[error("{phase} was interrupted by a shutdown signal")]
    Interrupted { phase: String },

    /// Workers were still running `grace` after the phase deadline and had
    /// to be aborted.
    #[error("{phase} workers did not stop within {grace:?} of the deadline")]
    GraceExceeded { phase: String, grace: Duration },
}
