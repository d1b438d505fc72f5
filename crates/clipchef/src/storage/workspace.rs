//! Per-job artifact directories
//!
//! Each job gets its own directory under the data root for the downloaded
//! video and extracted audio. Purging is best-effort: a job must never fail
//! or stall because its leftovers could not be removed.

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Owns the artifact root and hands out per-job directories
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    root: PathBuf,
}

impl JobWorkspace {
    /// Create a workspace rooted at `root`. The root itself is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Artifact root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one job's artifacts
    pub fn job_dir(&self, job_id: Uuid) -> PathBuf {
        self.root.join(job_id.to_string())
    }

    /// Create (if needed) and return the job's directory
    pub fn ensure_job_dir(&self, job_id: Uuid) -> Result<PathBuf> {
        let dir = self.job_dir(job_id);
        fs::create_dir_all(&dir).map_err(|e| {
            Error::Internal(format!("Failed to create job dir {}: {}", dir.display(), e))
        })?;
        Ok(dir)
    }

    /// Remove a job's artifacts. Best-effort: failures are logged, never raised.
    pub fn purge(&self, job_id: Uuid) {
        let dir = self.job_dir(job_id);
        if !dir.exists() {
            return;
        }
        match fs::remove_dir_all(&dir) {
            Ok(()) => tracing::debug!("Purged artifacts for job {}", job_id),
            Err(e) => tracing::warn!("Failed to purge artifacts for job {}: {}", job_id, e),
        }
    }
}
