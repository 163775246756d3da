// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wb list-runs` — print run history as a table.

use waivern_storage::StateStore;

use super::support::open_stores;
use crate::exit_error::ExitError;

pub async fn handle_list_runs() -> Result<(), ExitError> {
    let (_, state_store) = open_stores().map_err(ExitError::from)?;
    let runs = state_store.list_runs().await.map_err(|e| ExitError::new(4, e.to_string()))?;

    if runs.is_empty() {
        eprintln!("No runs recorded yet");
        return Ok(());
    }

    println!("{:<38} {:<18} {:<26} {:<26} {:<10}", "RUN ID", "RUNBOOK HASH", "STARTED", "FINISHED", "OUTCOME");
    for run in runs {
        let finished = run.finished_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string());
        let outcome = run.outcome.map(|o| o.to_string()).unwrap_or_else(|| "running".to_string());
        println!(
            "{:<38} {:<18} {:<26} {:<26} {:<10}",
            run.run_id.to_string(),
            run.runbook_hash,
            run.started_at.to_rfc3339(),
            finished,
            outcome
        );
    }
    Ok(())
}
