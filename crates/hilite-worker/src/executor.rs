//! Job executor.
//!
//! Each submitted job runs the blocking assembly pipeline on its own
//! spawn_blocking thread, bounded by a semaphore. Jobs share nothing
//! but the status store; any failure, panics included, lands in the
//! failing job's own status record.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use hilite_media::{
    AssemblerConfig, AssemblyReport, Detector, FrameSource, MediaResult, TimelineAssembler,
    VideoFileSink, VideoFileSource,
};
use hilite_models::HighlightJob;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::status::JobStatusStore;

/// Factory producing a fresh detector per job.
///
/// Constructor injection keeps the model out of global state and lets
/// tests substitute deterministic stubs.
pub type DetectorFactory = Arc<dyn Fn() -> MediaResult<Box<dyn Detector>> + Send + Sync>;

/// Executes highlight jobs with bounded concurrency.
pub struct JobExecutor {
    config: WorkerConfig,
    store: JobStatusStore,
    detector_factory: DetectorFactory,
    job_semaphore: Arc<Semaphore>,
}

impl JobExecutor {
    /// Create a new executor.
    pub fn new(config: WorkerConfig, store: JobStatusStore, detector_factory: DetectorFactory) -> Self {
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        Self {
            config,
            store,
            detector_factory,
            job_semaphore,
        }
    }

    /// The status store jobs report into.
    pub fn store(&self) -> &JobStatusStore {
        &self.store
    }

    /// Submit a job. Returns a handle that resolves when the job has
    /// reached a terminal state; status is tracked in the store either
    /// way.
    pub fn submit(&self, job: HighlightJob) -> JoinHandle<()> {
        let job_id = job.id.clone();
        self.store.insert(job_id.clone());

        let store = self.store.clone();
        let config = self.config.clone();
        let detector_factory = Arc::clone(&self.detector_factory);
        let semaphore = Arc::clone(&self.job_semaphore);

        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(p) => p,
                Err(_) => {
                    store.fail(&job_id, "Executor shut down before job started");
                    return;
                }
            };

            info!(job_id = %job_id, input = %job.input_path.display(), "Executing job");
            store.mark_processing(&job_id);

            let pipeline_store = store.clone();
            let pipeline_job = job.clone();
            let result = tokio::task::spawn_blocking(move || {
                run_pipeline(&pipeline_job, &config, detector_factory, pipeline_store)
            })
            .await;

            match result {
                Ok(Ok(report)) => {
                    info!(
                        job_id = %job_id,
                        original_frames = report.original_frames,
                        output_frames = report.output_frames,
                        freezes = report.freezes_applied,
                        "Job completed"
                    );
                    store.complete(&job_id, job.output_path);
                }
                Ok(Err(e)) => {
                    error!(job_id = %job_id, "Job failed: {e}");
                    store.fail(&job_id, e.to_string());
                }
                Err(join_err) => {
                    error!(job_id = %job_id, "Job task aborted: {join_err}");
                    store.fail(&job_id, format!("Job task aborted: {join_err}"));
                }
            }
        })
    }
}

/// Run one job's pipeline start to finish.
///
/// Decoder and encoder handles release on drop, so resources are freed
/// on every exit path, success or failure.
fn run_pipeline(
    job: &HighlightJob,
    config: &WorkerConfig,
    detector_factory: DetectorFactory,
    store: JobStatusStore,
) -> WorkerResult<AssemblyReport> {
    let source = VideoFileSource::open(&job.input_path)?;
    let sink = VideoFileSink::create(
        &job.output_path,
        source.fps(),
        source.width(),
        source.height(),
    )?;
    let detector = detector_factory()?;

    let assembler_config = AssemblerConfig {
        freeze_duration_secs: config.freeze_duration_secs,
        match_threshold: config.match_threshold,
        policy: config.freeze_policy,
        ..Default::default()
    };

    let job_id = job.id.clone();
    let report =
        TimelineAssembler::new(source, sink, detector, job.selections.clone(), assembler_config)
            .with_progress(Box::new(move |pct| store.set_progress(&job_id, pct)))
            .run()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite_models::{JobStatus, PixelBox, Selection};

    fn stub_factory() -> DetectorFactory {
        Arc::new(|| {
            Err(hilite_media::MediaError::detection_failed(
                "stub factory should not be reached in these tests",
            ))
        })
    }

    fn job_for(input: &str) -> HighlightJob {
        let out_dir = tempfile::tempdir().unwrap().into_path();
        HighlightJob::new(
            input,
            out_dir.join("out.mp4"),
            vec![Selection::new(3, PixelBox::new(0, 0, 10, 10).unwrap(), 0.9)],
        )
    }

    #[tokio::test]
    async fn test_missing_source_fails_the_job() {
        let executor = JobExecutor::new(
            WorkerConfig::default(),
            JobStatusStore::new(),
            stub_factory(),
        );

        let job = job_for("/nonexistent/input.mp4");
        let job_id = job.id.clone();
        executor.submit(job).await.unwrap();

        let record = executor.store().get(&job_id).unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.error_message.is_some());
    }

    #[tokio::test]
    async fn test_failures_do_not_cross_jobs() {
        let executor = JobExecutor::new(
            WorkerConfig::default(),
            JobStatusStore::new(),
            stub_factory(),
        );

        let failing = job_for("/nonexistent/a.mp4");
        let failing_id = failing.id.clone();
        let other = job_for("/nonexistent/b.mp4");
        let other_id = other.id.clone();

        let h1 = executor.submit(failing);
        let h2 = executor.submit(other);
        h1.await.unwrap();
        h2.await.unwrap();

        let a = executor.store().get(&failing_id).unwrap();
        let b = executor.store().get(&other_id).unwrap();
        // Each job carries only its own error
        assert_eq!(a.status, JobStatus::Failed);
        assert_eq!(b.status, JobStatus::Failed);
        assert!(a.error_message.as_deref().unwrap().contains("a.mp4"));
        assert!(b.error_message.as_deref().unwrap().contains("b.mp4"));
    }

    #[tokio::test]
    async fn test_submit_registers_queued_status() {
        let executor = JobExecutor::new(
            WorkerConfig {
                max_concurrent_jobs: 1,
                ..Default::default()
            },
            JobStatusStore::new(),
            stub_factory(),
        );

        let job = job_for("/nonexistent/c.mp4");
        let job_id = job.id.clone();
        let handle = executor.submit(job);

        // Record exists from the moment of submission
        assert!(executor.store().get(&job_id).is_some());
        handle.await.unwrap();
        assert!(executor.store().get(&job_id).unwrap().is_terminal());
    }
}
