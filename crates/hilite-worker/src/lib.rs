//! Highlight job worker.
//!
//! Runs highlight-assembly jobs with bounded concurrency and tracks
//! their status in a shared, concurrency-safe store.

pub mod config;
pub mod error;
pub mod executor;
pub mod status;

pub use config::{parse_policy, WorkerConfig};
pub use error::{WorkerError, WorkerResult};
pub use executor::{DetectorFactory, JobExecutor};
pub use status::JobStatusStore;
