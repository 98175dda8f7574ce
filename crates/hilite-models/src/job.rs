//! Highlight job definitions.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::selection::Selection;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One highlight-assembly job: a source video plus the player selections
/// to freeze on, producing a single output file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HighlightJob {
    /// Unique job ID
    pub id: JobId,

    /// Source video path
    pub input_path: PathBuf,

    /// Output video path
    pub output_path: PathBuf,

    /// Player selections; sorted ascending by frame index before the run
    pub selections: Vec<Selection>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl HighlightJob {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        selections: Vec<Selection>,
    ) -> Self {
        Self {
            id: JobId::new(),
            input_path: input_path.into(),
            output_path: output_path.into(),
            selections,
            created_at: Utc::now(),
        }
    }
}
