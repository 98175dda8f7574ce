//! Worker configuration.

use std::path::PathBuf;

use hilite_media::FreezePolicy;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Freeze duration per selection, in seconds of output time
    pub freeze_duration_secs: f64,
    /// Maximum re-identification distance in source pixels
    pub match_threshold: f64,
    /// Freeze timeline policy
    pub freeze_policy: FreezePolicy,
    /// Detection model file
    pub model_path: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            freeze_duration_secs: 1.5,
            match_threshold: 200.0,
            freeze_policy: FreezePolicy::Additive,
            model_path: PathBuf::from("models/yolov8n.onnx"),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_jobs),
            freeze_duration_secs: std::env::var("WORKER_FREEZE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.freeze_duration_secs),
            match_threshold: std::env::var("WORKER_MATCH_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.match_threshold),
            freeze_policy: std::env::var("WORKER_FREEZE_POLICY")
                .ok()
                .and_then(|s| parse_policy(&s).ok())
                .unwrap_or(defaults.freeze_policy),
            model_path: std::env::var("WORKER_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
        }
    }
}

/// Parse a freeze policy name ("additive" or "replace_source").
pub fn parse_policy(s: &str) -> WorkerResult<FreezePolicy> {
    match s.to_ascii_lowercase().as_str() {
        "additive" => Ok(FreezePolicy::Additive),
        "replace_source" | "replace" => Ok(FreezePolicy::ReplaceSource),
        other => Err(WorkerError::config_error(format!(
            "unknown freeze policy '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_concurrent_jobs, 2);
        assert_eq!(config.freeze_policy, FreezePolicy::Additive);
        assert!((config.freeze_duration_secs - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("additive").unwrap(), FreezePolicy::Additive);
        assert_eq!(parse_policy("REPLACE").unwrap(), FreezePolicy::ReplaceSource);
        assert_eq!(
            parse_policy("replace_source").unwrap(),
            FreezePolicy::ReplaceSource
        );
        assert!(parse_policy("bogus").is_err());
    }
}
