// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use waivern_core::{ArtifactId, ArtifactStatus, RunId};

use super::{RunOutcome, RunRecord, StateStore, StateStoreError};

#[derive(Default)]
struct Inner {
    runs: HashMap<RunId, RunRecord>,
    order: Vec<RunId>,
    statuses: HashMap<RunId, HashMap<ArtifactId, ArtifactStatus>>,
}

/// An in-process [`StateStore`] backed by maps.
#[derive(Default)]
pub struct InMemoryStateStore {
    inner: RwLock<Inner>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn record_run_started(&self, record: RunRecord) -> Result<(), StateStoreError> {
        let mut inner = self.inner.write();
        inner.order.push(record.run_id);
        inner.runs.insert(record.run_id, record);
        Ok(())
    }

    async fn record_run_finished(
        &self,
        run: RunId,
        outcome: RunOutcome,
        finished_at: DateTime<Utc>,
    ) -> Result<(), StateStoreError> {
        let mut inner = self.inner.write();
        let (succeeded_count, failed_count) = tally(inner.statuses.get(&run));
        let record = inner.runs.get_mut(&run).ok_or(StateStoreError::RunNotFound(run))?;
        record.finished_at = Some(finished_at);
        record.outcome = Some(outcome);
        record.succeeded_count = succeeded_count;
        record.failed_count = failed_count;
        Ok(())
    }

    async fn get_run(&self, run: RunId) -> Result<RunRecord, StateStoreError> {
        self.inner.read().runs.get(&run).cloned().ok_or(StateStoreError::RunNotFound(run))
    }

    async fn list_runs(&self) -> Result<Vec<RunRecord>, StateStoreError> {
        let inner = self.inner.read();
        Ok(inner.order.iter().rev().filter_map(|id| inner.runs.get(id).cloned()).collect())
    }

    async fn set_artifact_status(
        &self,
        run: RunId,
        artifact: &ArtifactId,
        status: ArtifactStatus,
    ) -> Result<(), StateStoreError> {
        let mut inner = self.inner.write();
        let run_statuses = inner.statuses.entry(run).or_default();
        if let Some(&current) = run_statuses.get(artifact) {
            if !current.can_transition_to(status) {
                return Err(StateStoreError::InvalidTransition {
                    artifact: artifact.clone(),
                    from: current,
                    to: status,
                });
            }
        }
        run_statuses.insert(artifact.clone(), status);
        Ok(())
    }

    async fn get_artifact_status(
        &self,
        run: RunId,
        artifact: &ArtifactId,
    ) -> Result<Option<ArtifactStatus>, StateStoreError> {
        Ok(self.inner.read().statuses.get(&run).and_then(|m| m.get(artifact)).copied())
    }

    async fn all_statuses(&self, run: RunId) -> Result<HashMap<ArtifactId, ArtifactStatus>, StateStoreError> {
        Ok(self.inner.read().statuses.get(&run).cloned().unwrap_or_default())
    }
}

fn tally(statuses: Option<&HashMap<ArtifactId, ArtifactStatus>>) -> (usize, usize) {
    let Some(statuses) = statuses else { return (0, 0) };
    let succeeded = statuses.values().filter(|s| **s == ArtifactStatus::Succeeded).count();
    let failed = statuses.values().filter(|s| **s == ArtifactStatus::Failed).count();
    (succeeded, failed)
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
