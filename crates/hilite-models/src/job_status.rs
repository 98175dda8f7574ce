//! Job status records for progress tracking and polling.
//!
//! A worker task owns the writes to its job's record; an unrelated
//! query path reads it. The record itself is plain data, synchronization
//! lives in the worker's status store.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued waiting for a worker slot
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one job's state for polling queries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobStatusRecord {
    /// Unique job identifier
    pub job_id: JobId,
    /// Current job status
    pub status: JobStatus,
    /// Progress percentage (0-100), monotonically non-decreasing
    pub progress: u8,
    /// Error message if the job failed
    pub error_message: Option<String>,
    /// Output file, set on completion
    pub output_path: Option<PathBuf>,
    /// When the job was started
    pub started_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl JobStatusRecord {
    /// Create a fresh record in the queued state.
    pub fn new(job_id: JobId) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            status: JobStatus::Queued,
            progress: 0,
            error_message: None,
            output_path: None,
            started_at: now,
            updated_at: now,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Update the status and bump the updated_at timestamp.
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Update progress. Values never decrease and cap at 100.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = self.progress.max(progress.min(100));
        self.updated_at = Utc::now();
    }

    /// Mark the job as completed with its output file.
    pub fn complete(&mut self, output_path: PathBuf) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.output_path = Some(output_path);
        self.updated_at = Utc::now();
    }

    /// Mark the job as failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = JobStatusRecord::new(JobId::new());
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.progress, 0);
        assert!(!record.is_terminal());
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut record = JobStatusRecord::new(JobId::new());
        record.set_progress(40);
        record.set_progress(25);
        assert_eq!(record.progress, 40);
        record.set_progress(200);
        assert_eq!(record.progress, 100);
    }

    #[test]
    fn test_status_transitions() {
        let mut record = JobStatusRecord::new(JobId::new());

        record.set_status(JobStatus::Processing);
        assert!(!record.is_terminal());

        record.complete(PathBuf::from("/tmp/out.mp4"));
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 100);
        assert!(record.is_terminal());
    }

    #[test]
    fn test_failure_records_message() {
        let mut record = JobStatusRecord::new(JobId::new());
        record.fail("could not open source");
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("could not open source"));
        assert!(record.is_terminal());
    }
}
