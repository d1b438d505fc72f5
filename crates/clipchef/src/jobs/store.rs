//! Bounded in-memory job registry
//!
//! The store is the single source of truth for job state. It holds at most
//! `max_jobs` records; every `create` runs a maintenance pass that first
//! removes records older than the retention horizon, then evicts the
//! oldest records by insertion order until the store fits. Evicted and
//! deleted jobs have their artifact directories purged best-effort, after
//! the lock is released.
//!
//! Mutations on a missing id are silent no-ops: eviction may race an
//! in-flight pipeline, and the pipeline's late updates must simply vanish.

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

use super::record::{JobRecord, JobStage, JobStatus};
use crate::config::JobsConfig;
use crate::storage::JobWorkspace;
use crate::types::{AnalysisResult, MediaAsset};

/// Store statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_jobs: usize,
    pub max_jobs: usize,
    pub status_counts: HashMap<String, usize>,
}

struct StoreInner {
    jobs: HashMap<Uuid, JobRecord>,
    /// Insertion order, oldest at the front. Kept in sync with `jobs`.
    order: VecDeque<Uuid>,
}

/// Concurrency-safe registry of analysis jobs
pub struct JobStore {
    inner: RwLock<StoreInner>,
    max_jobs: usize,
    expire_hours: i64,
    workspace: JobWorkspace,
}

impl JobStore {
    /// Create a store with the configured bounds and artifact root
    pub fn new(config: &JobsConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                jobs: HashMap::new(),
                order: VecDeque::new(),
            }),
            max_jobs: config.max_jobs,
            expire_hours: config.expire_hours,
            workspace: JobWorkspace::new(config.data_dir.clone()),
        }
    }

    /// Insert a fresh pending record, then run the maintenance pass.
    /// Ids are caller-minted UUIDs; reusing one is a programming error.
    pub fn create(&self, id: Uuid, url: String, video_id: Option<String>) -> JobRecord {
        let record = JobRecord::new(id, url, video_id);

        let evicted = {
            let mut inner = self.inner.write();
            let prev = inner.jobs.insert(id, record.clone());
            debug_assert!(prev.is_none(), "duplicate job id {id}");
            inner.order.push_back(id);
            self.run_maintenance(&mut inner)
        };

        // Disk I/O happens outside the lock
        for evicted_id in &evicted {
            self.workspace.purge(*evicted_id);
        }

        record
    }

    /// Snapshot a record
    pub fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.inner.read().jobs.get(&id).cloned()
    }

    /// Apply a mutation if the record still exists; refresh `updated_at`.
    /// Missing id is a silent no-op.
    pub fn update<F>(&self, id: Uuid, f: F)
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut inner = self.inner.write();
        if let Some(record) = inner.jobs.get_mut(&id) {
            f(record);
            record.updated_at = Utc::now();
        }
    }

    /// Move a job forward within its run
    pub fn advance(&self, id: Uuid, stage: JobStage, progress: u8, message: impl Into<String>) {
        let message = message.into();
        self.update(id, |record| record.advance(stage, progress, message));
    }

    /// Attach acquisition metadata
    pub fn set_video_info(&self, id: Uuid, asset: MediaAsset) {
        self.update(id, |record| record.set_video_info(asset));
    }

    /// Mark a job completed with its result
    pub fn complete(&self, id: Uuid, result: AnalysisResult) {
        self.update(id, |record| record.complete(result));
    }

    /// Mark a job failed
    pub fn fail(&self, id: Uuid, message: impl Into<String>) {
        let message = message.into();
        self.update(id, |record| record.fail(message));
    }

    /// Remove a record and purge its artifacts. Returns false if absent.
    pub fn delete(&self, id: Uuid) -> bool {
        let removed = {
            let mut inner = self.inner.write();
            let removed = inner.jobs.remove(&id).is_some();
            if removed {
                inner.order.retain(|x| x != &id);
            }
            removed
        };

        if removed {
            self.workspace.purge(id);
            tracing::info!("Deleted job {}", id);
        }

        removed
    }

    /// Store statistics
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let mut status_counts: HashMap<String, usize> = HashMap::new();
        for record in inner.jobs.values() {
            *status_counts
                .entry(record.status.as_str().to_string())
                .or_insert(0) += 1;
        }
        StoreStats {
            total_jobs: inner.jobs.len(),
            max_jobs: self.max_jobs,
            status_counts,
        }
    }

    /// Number of retained jobs
    pub fn len(&self) -> usize {
        self.inner.read().jobs.len()
    }

    /// True when no jobs are retained
    pub fn is_empty(&self) -> bool {
        self.inner.read().jobs.is_empty()
    }

    /// Artifact workspace shared with the pipeline
    pub fn workspace(&self) -> &JobWorkspace {
        &self.workspace
    }

    /// Two-phase cleanup under the write lock. Returns the removed ids so
    /// the caller can purge their artifacts after unlocking.
    fn run_maintenance(&self, inner: &mut StoreInner) -> Vec<Uuid> {
        let StoreInner { jobs, order } = inner;
        let mut removed = Vec::new();

        // Phase 1: drop records past the retention horizon
        let cutoff = Utc::now() - Duration::hours(self.expire_hours);
        let expired: Vec<Uuid> = order
            .iter()
            .copied()
            .filter(|id| {
                jobs.get(id)
                    .is_some_and(|record| record.created_at < cutoff)
            })
            .collect();
        for id in expired {
            jobs.remove(&id);
            tracing::info!("Expired job {} removed", id);
            removed.push(id);
        }
        order.retain(|id| jobs.contains_key(id));

        // Phase 2: evict oldest-first until we fit
        while jobs.len() > self.max_jobs {
            let Some(oldest) = order.pop_front() else {
                break;
            };
            if jobs.remove(&oldest).is_some() {
                tracing::info!("Evicted job {} (store over capacity)", oldest);
                removed.push(oldest);
            }
        }

        removed
    }
}
