//! Brunt — a small, phased load-test engine for Rust.
//!
//! Brunt drives a fixed set of concurrent workers against a remote target and
//! measures what comes back. A run is split into phases so the numbers mean
//! something: a warmup at reduced parallelism fills caches and connection
//! pools, an optional pause lets the system settle, and only then does the
//! measurement phase run at full parallelism. Each phase is bounded by a
//! deadline, drains its in-flight requests, and reports exact counts.
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`LoadTest`]: the orchestrator. Validates a [`LoadTestRequest`], walks it
//!   through the phases, and folds every outcome into a [`LoadTestReport`].
//! - [`PhaseExecutor`]: runs one phase. Spawns workers that loop "pick a
//!   random target, call the client, record the outcome" until the deadline,
//!   then joins them within a grace period.
//! - [`OutcomeRecorder`]: thread-safe accumulator the workers feed. Snapshots
//!   into [`PhaseStats`] once a phase has drained.
//! - [`TargetClient`]: the single seam to the system under test. Implement it
//!   for whatever protocol you need; an HTTP client ships behind the `http`
//!   feature.
//!
//! # Design goals
//!
//! - Failures are data: a request that errors is counted and the workers move
//!   on. Only an invalid request or an interrupted run fails the test itself.
//! - Deterministic accounting: latency aggregates cover successes only, a
//!   zero-length phase reports zeroes instead of dividing by them, and
//!   in-flight requests are never cut off at the deadline.
//! - Small surface: one trait to implement, one builder to fill in, one
//!   serializable report out.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use brunt::{BoxError, LoadTest, LoadTestRequest, TargetClient};
//!
//! struct SleepyClient;
//!
//! #[async_trait]
//! impl TargetClient for SleepyClient {
//!     async fn fetch(&self, _target: u64) -> Result<(), BoxError> {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let request = LoadTestRequest::builder()
//!         .targets(vec![1, 2, 3])
//!         .parallelism(20)
//!         .warmup_secs(5)
//!         .pause_secs(1)
//!         .measurement_secs(30)
//!         .build();
//!
//!     let load_test = LoadTest::builder().client(Arc::new(SleepyClient)).build();
//!     let report = load_test.run(request).await;
//!     println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! }
//! ```
//!
//! # Feature flags
//! - `http` (default): the reqwest-backed [`HttpTargetClient`](client::HttpTargetClient)
//! - `internals`: enable access to internal (and unstable) functions and useful implementation resources
//!
//! # Where to start
//!
//! - Read the docs for [`LoadTest`] and [`TargetClient`]. The trait includes
//!   an `# Example` section that compiles and demonstrates a minimal
//!   implementation.

/// The seam between the engine and the system under test
pub mod client;
/// Validation and interruption errors
pub mod error;
/// Orchestrators that define how a single phase actually runs
pub mod executor;
/// Main module of the engine that glues everything together
pub mod loadtest;
/// Thread-safe outcome accumulation
pub mod recorder;
/// Reports and per-phase statistics
pub mod report;
/// Load-test parameters and their validation
pub mod request;

#[cfg(feature = "http")]
pub use client::HttpTargetClient;
pub use client::{BoxError, TargetClient};
pub use error::{Error, Result};
pub use executor::{PhaseContext, PhaseExecutor};
pub use loadtest::LoadTest;
pub use recorder::OutcomeRecorder;
pub use report::{LoadTestReport, PhaseStats, TestStatus};
pub use request::LoadTestRequest;
