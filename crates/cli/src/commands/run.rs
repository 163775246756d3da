// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wb run` — parse a runbook, plan it, and execute it to completion.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use waivern_core::{RunId, SystemClock};
use waivern_engine::{Executor, ExecutorConfig};
use waivern_storage::StateStore;

use super::support::{load_plan, open_stores};
use crate::exit_error::ExitError;

pub async fn handle_run(runbook_path: &Path, run_id: Option<RunId>) -> Result<(), ExitError> {
    run_plan(runbook_path, run_id).await
}

pub(crate) async fn run_plan(runbook_path: &Path, run_id: Option<RunId>) -> Result<(), ExitError> {
    let (artifact_store, state_store) = open_stores().map_err(ExitError::from)?;
    let (runbook, plan, runbook_hash) =
        load_plan(runbook_path, artifact_store.as_ref()).await.map_err(ExitError::from)?;

    let run_id = run_id.unwrap_or_else(RunId::new);

    let executor = Executor::new(artifact_store, state_store.clone(), SystemClock);
    let config = ExecutorConfig {
        max_concurrency: runbook.config.max_concurrency,
        timeout: runbook.config.timeout.map(std::time::Duration::from_secs),
    };

    executor.run(&plan, run_id, &runbook_hash, config, CancellationToken::new()).await?;

    let record = state_store.get_run(run_id).await.map_err(|e| ExitError::new(4, e.to_string()))?;
    println!("{}", serde_json::to_string_pretty(&record).map_err(|e| ExitError::new(4, e.to_string()))?);
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
