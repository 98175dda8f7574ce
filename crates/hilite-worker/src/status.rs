//! Concurrency-safe job status store.
//!
//! Worker tasks write their own job's record; the polling path reads
//! any record. Both go through this handle, never a bare shared map.
//! Methods are synchronous so the blocking pipeline thread can report
//! progress directly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use hilite_models::{JobId, JobStatus, JobStatusRecord};

/// Cloneable handle to the shared status map.
#[derive(Debug, Clone, Default)]
pub struct JobStatusStore {
    inner: Arc<RwLock<HashMap<JobId, JobStatusRecord>>>,
}

impl JobStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job in the queued state.
    pub fn insert(&self, job_id: JobId) {
        let record = JobStatusRecord::new(job_id.clone());
        self.inner.write().unwrap().insert(job_id, record);
    }

    /// Snapshot a job's current record.
    pub fn get(&self, job_id: &JobId) -> Option<JobStatusRecord> {
        self.inner.read().unwrap().get(job_id).cloned()
    }

    /// Move a job into the processing state.
    pub fn mark_processing(&self, job_id: &JobId) {
        self.update(job_id, |record| record.set_status(JobStatus::Processing));
    }

    /// Report progress for a job. Values never decrease.
    pub fn set_progress(&self, job_id: &JobId, progress: u8) {
        self.update(job_id, |record| record.set_progress(progress));
    }

    /// Mark a job completed with its output file.
    pub fn complete(&self, job_id: &JobId, output_path: PathBuf) {
        self.update(job_id, |record| record.complete(output_path));
    }

    /// Mark a job failed. Only this job's record is touched.
    pub fn fail(&self, job_id: &JobId, error: impl Into<String>) {
        let error = error.into();
        self.update(job_id, move |record| record.fail(error));
    }

    fn update(&self, job_id: &JobId, f: impl FnOnce(&mut JobStatusRecord)) {
        let mut map = self.inner.write().unwrap();
        if let Some(record) = map.get_mut(job_id) {
            f(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let store = JobStatusStore::new();
        let id = JobId::new();
        store.insert(id.clone());

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, JobStatus::Queued);
        assert!(store.get(&JobId::new()).is_none());
    }

    #[test]
    fn test_progress_updates_are_monotonic() {
        let store = JobStatusStore::new();
        let id = JobId::new();
        store.insert(id.clone());

        store.set_progress(&id, 30);
        store.set_progress(&id, 10);
        assert_eq!(store.get(&id).unwrap().progress, 30);
    }

    #[test]
    fn test_failure_is_isolated_per_job() {
        let store = JobStatusStore::new();
        let failing = JobId::new();
        let healthy = JobId::new();
        store.insert(failing.clone());
        store.insert(healthy.clone());
        store.mark_processing(&healthy);

        store.fail(&failing, "decode error");

        assert_eq!(store.get(&failing).unwrap().status, JobStatus::Failed);
        assert_eq!(store.get(&healthy).unwrap().status, JobStatus::Processing);
        assert!(store.get(&healthy).unwrap().error_message.is_none());
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let store = JobStatusStore::new();
        let id = JobId::new();
        store.insert(id.clone());

        let writer = {
            let store = store.clone();
            let id = id.clone();
            std::thread::spawn(move || {
                for pct in 0..=100u8 {
                    store.set_progress(&id, pct);
                }
            })
        };

        let reader = {
            let store = store.clone();
            let id = id.clone();
            std::thread::spawn(move || {
                let mut last = 0u8;
                for _ in 0..200 {
                    let pct = store.get(&id).unwrap().progress;
                    assert!(pct >= last);
                    last = pct;
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(store.get(&id).unwrap().progress, 100);
    }
}
