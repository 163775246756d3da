// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup used by every command: opening the filesystem-backed
//! stores and turning a runbook path into a validated execution plan.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use waivern_engine::{build_plan, ExecutionPlan};
use waivern_registry::Registry;
use waivern_runbook::Runbook;
use waivern_storage::{ArtifactStore, FilesystemArtifactStore, FilesystemStateStore, StateStore};

pub fn open_stores() -> anyhow::Result<(Arc<dyn ArtifactStore>, Arc<dyn StateStore>)> {
    let artifacts = FilesystemArtifactStore::new(crate::env::artifact_dir()?);
    let state = FilesystemStateStore::new(crate::env::state_dir()?.join("runs.d"));
    Ok((Arc::new(artifacts), Arc::new(state)))
}

/// Parses and plans `runbook_path`, returning the resolved [`Runbook`], its
/// [`ExecutionPlan`], and a content hash of the runbook file's own raw text
/// (pre-include, pre-interpolation) for resume comparison.
pub async fn load_plan(
    runbook_path: &Path,
    artifact_store: &dyn ArtifactStore,
) -> anyhow::Result<(Runbook, ExecutionPlan, String)> {
    let raw = std::fs::read_to_string(runbook_path)
        .with_context(|| format!("reading runbook {}", runbook_path.display()))?;
    let runbook = waivern_runbook::include::load(runbook_path)
        .with_context(|| format!("loading runbook {}", runbook_path.display()))?;
    let registry = Registry::discover();
    let plan = build_plan(&runbook, &registry, artifact_store).await?;
    let hash = waivern_runbook::content_hash(&raw);
    Ok((runbook, plan, hash))
}
