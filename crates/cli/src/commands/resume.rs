// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wb resume` — re-run a runbook against an existing run id. Artifacts
//! already `Succeeded` under that run id are skipped automatically; an
//! artifact's own `reuse:` clause (if it has one) copies content from a
//! different, named prior run regardless of which run id this invocation
//! uses.

use std::path::Path;

use waivern_core::RunId;

use super::run::run_plan;
use crate::exit_error::ExitError;

pub async fn handle_resume(run_id: RunId, runbook_path: &Path) -> Result<(), ExitError> {
    run_plan(runbook_path, Some(run_id)).await
}
