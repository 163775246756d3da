// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use waivern_core::{ArtifactId, ArtifactStatus, RunId};

use super::{RunOutcome, RunRecord, StateStore, StateStoreError};
use crate::atomic::write_atomic;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RunFile {
    record: RunRecord,
    statuses: HashMap<ArtifactId, ArtifactStatus>,
}

/// A JSON-on-disk [`StateStore`], one file per run under
/// `root/runs/<run_id>/_system/state.json`, written atomically, sharing
/// `root` with a sibling [`crate::FilesystemArtifactStore`] without
/// colliding: `_system` is reserved and excluded from that store's
/// `list_keys`/`clear`. An in-process lock serializes read-modify-write
/// cycles against the same run file; cross-process coordination is out
/// of scope.
pub struct FilesystemStateStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FilesystemStateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), lock: Mutex::new(()) }
    }

    fn run_dir(&self, run: RunId) -> PathBuf {
        self.root.join("runs").join(run.to_string())
    }

    fn path_for(&self, run: RunId) -> PathBuf {
        self.run_dir(run).join("_system").join("state.json")
    }

    async fn read_run_file(&self, run: RunId) -> Result<RunFile, StateStoreError> {
        let bytes = tokio::fs::read(self.path_for(run)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StateStoreError::RunNotFound(run)
            } else {
                StateStoreError::Io(e.to_string())
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|e| StateStoreError::Io(e.to_string()))
    }

    async fn write_run_file(&self, run: RunId, file: &RunFile) -> Result<(), StateStoreError> {
        let bytes = serde_json::to_vec(file).map_err(|e| StateStoreError::Io(e.to_string()))?;
        write_atomic(&self.path_for(run), &bytes).await.map_err(|e| StateStoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl StateStore for FilesystemStateStore {
    /// Idempotent: starting a run id that already has a file on disk keeps
    /// its recorded statuses, so resuming under the same run id doesn't
    /// discard progress a prior attempt made.
    async fn record_run_started(&self, record: RunRecord) -> Result<(), StateStoreError> {
        let _guard = self.lock.lock().await;
        let statuses = match self.read_run_file(record.run_id).await {
            Ok(existing) => existing.statuses,
            Err(StateStoreError::RunNotFound(_)) => HashMap::new(),
            Err(e) => return Err(e),
        };
        let file = RunFile { record, statuses };
        self.write_run_file(file.record.run_id, &file).await
    }

    async fn record_run_finished(
        &self,
        run: RunId,
        outcome: RunOutcome,
        finished_at: DateTime<Utc>,
    ) -> Result<(), StateStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_run_file(run).await?;
        file.record.finished_at = Some(finished_at);
        file.record.outcome = Some(outcome);
        file.record.succeeded_count = file.statuses.values().filter(|s| **s == ArtifactStatus::Succeeded).count();
        file.record.failed_count = file.statuses.values().filter(|s| **s == ArtifactStatus::Failed).count();
        self.write_run_file(run, &file).await
    }

    async fn get_run(&self, run: RunId) -> Result<RunRecord, StateStoreError> {
        Ok(self.read_run_file(run).await?.record)
    }

    async fn list_runs(&self) -> Result<Vec<RunRecord>, StateStoreError> {
        let runs_dir = self.root.join("runs");
        let mut entries = match tokio::fs::read_dir(&runs_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StateStoreError::Io(e.to_string())),
        };
        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| StateStoreError::Io(e.to_string()))? {
            let state_path = entry.path().join("_system").join("state.json");
            if let Ok(bytes) = tokio::fs::read(&state_path).await {
                let file: RunFile =
                    serde_json::from_slice(&bytes).map_err(|e| StateStoreError::Io(e.to_string()))?;
                records.push(file.record);
            }
        }
        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(records)
    }

    async fn set_artifact_status(
        &self,
        run: RunId,
        artifact: &ArtifactId,
        status: ArtifactStatus,
    ) -> Result<(), StateStoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_run_file(run).await?;
        if let Some(&current) = file.statuses.get(artifact) {
            if !current.can_transition_to(status) {
                return Err(StateStoreError::InvalidTransition {
                    artifact: artifact.clone(),
                    from: current,
                    to: status,
                });
            }
        }
        file.statuses.insert(artifact.clone(), status);
        self.write_run_file(run, &file).await
    }

    async fn get_artifact_status(
        &self,
        run: RunId,
        artifact: &ArtifactId,
    ) -> Result<Option<ArtifactStatus>, StateStoreError> {
        Ok(self.read_run_file(run).await?.statuses.get(artifact).copied())
    }

    async fn all_statuses(&self, run: RunId) -> Result<HashMap<ArtifactId, ArtifactStatus>, StateStoreError> {
        Ok(self.read_run_file(run).await?.statuses)
    }
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;
