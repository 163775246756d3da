// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable tracking of run history and per-artifact status, independent of
//! artifact content. A `resume` reads this store to decide
//! which artifacts can be skipped; it never touches [`crate::ArtifactStore`]
//! directly for that decision.

mod filesystem;
mod memory;
mod run_record;

pub use filesystem::FilesystemStateStore;
pub use memory::InMemoryStateStore;
pub use run_record::{RunOutcome, RunRecord};

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use waivern_core::{ArtifactId, ArtifactStatus, RunId};

#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("run {0} not found")]
    RunNotFound(RunId),

    #[error("artifact {artifact} cannot transition from {from} to {to}")]
    InvalidTransition { artifact: ArtifactId, from: ArtifactStatus, to: ArtifactStatus },

    #[error("state I/O error: {0}")]
    Io(String),
}

#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    async fn record_run_started(&self, record: RunRecord) -> Result<(), StateStoreError>;

    async fn record_run_finished(
        &self,
        run: RunId,
        outcome: RunOutcome,
        finished_at: DateTime<Utc>,
    ) -> Result<(), StateStoreError>;

    async fn get_run(&self, run: RunId) -> Result<RunRecord, StateStoreError>;

    /// All known runs, most recently started first.
    async fn list_runs(&self) -> Result<Vec<RunRecord>, StateStoreError>;

    async fn set_artifact_status(
        &self,
        run: RunId,
        artifact: &ArtifactId,
        status: ArtifactStatus,
    ) -> Result<(), StateStoreError>;

    async fn get_artifact_status(
        &self,
        run: RunId,
        artifact: &ArtifactId,
    ) -> Result<Option<ArtifactStatus>, StateStoreError>;

    /// Every artifact status recorded for `run`, used to seed a resume.
    async fn all_statuses(&self, run: RunId) -> Result<HashMap<ArtifactId, ArtifactStatus>, StateStoreError>;
}
