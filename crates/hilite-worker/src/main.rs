//! Highlight worker binary.
//!
//! Processes one highlight job from the command line: a source video, a
//! selections JSON file (the `[{frameIndex, box, confidence}]` shape the
//! selection UI produces), and an output path.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hilite_media::{Detector, MediaResult, YoloDetector};
use hilite_models::{HighlightJob, JobStatus, Selection};
use hilite_worker::{parse_policy, JobExecutor, JobStatusStore, WorkerConfig};

#[derive(Debug, Parser)]
#[command(name = "hilite-worker", about = "Assemble a freeze-frame highlight video")]
struct Cli {
    /// Source video file
    input: PathBuf,

    /// Player selections JSON file
    selections: PathBuf,

    /// Output video file
    output: PathBuf,

    /// Freeze duration in seconds (overrides WORKER_FREEZE_SECS)
    #[arg(long)]
    freeze_secs: Option<f64>,

    /// Freeze policy: "additive" or "replace_source"
    #[arg(long)]
    policy: Option<String>,

    /// Detection model file (overrides WORKER_MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("hilite=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();

    let mut config = WorkerConfig::from_env();
    if let Some(secs) = cli.freeze_secs {
        config.freeze_duration_secs = secs;
    }
    if let Some(policy) = cli.policy.as_deref() {
        config.freeze_policy = parse_policy(policy)?;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    info!("Worker config: {:?}", config);

    let selections = read_selections(&cli.selections)?;
    info!(count = selections.len(), "Loaded selections");

    let model_path = config.model_path.clone();
    let detector_factory = Arc::new(move || -> MediaResult<Box<dyn Detector>> {
        Ok(Box::new(YoloDetector::load(&model_path)?))
    });

    let store = JobStatusStore::new();
    let executor = JobExecutor::new(config, store.clone(), detector_factory);

    let job = HighlightJob::new(cli.input, cli.output, selections);
    let job_id = job.id.clone();
    let handle = executor.submit(job);

    // Poll status until the job reaches a terminal state
    let mut last_reported = 0u8;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let Some(record) = store.get(&job_id) else {
            continue;
        };
        if record.progress > last_reported {
            info!(progress = record.progress, "Processing");
            last_reported = record.progress;
        }
        if record.is_terminal() {
            break;
        }
    }
    handle.await.ok();

    let record = store
        .get(&job_id)
        .context("job record disappeared from the status store")?;
    match record.status {
        JobStatus::Completed => {
            info!(output = %record.output_path.unwrap_or_default().display(), "Highlight created");
            Ok(())
        }
        JobStatus::Failed => anyhow::bail!(
            "job failed: {}",
            record.error_message.unwrap_or_else(|| "unknown error".into())
        ),
        other => anyhow::bail!("job ended in unexpected state '{other}'"),
    }
}

/// Read and sort the selections file.
fn read_selections(path: &PathBuf) -> anyhow::Result<Vec<Selection>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read selections file {}", path.display()))?;
    let mut selections: Vec<Selection> =
        serde_json::from_str(&raw).context("invalid selections JSON")?;
    hilite_models::sort_selections(&mut selections);
    Ok(selections)
}
