// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waivern_core::RunId;

/// How a run attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed,
    Cancelled,
}

waivern_core::simple_display! {
    RunOutcome {
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// One row of run history: when a run started, when (and how) it finished,
/// and a tally of its artifacts.
///
/// `runbook_hash` (not the runbook's name) is what a resume compares
/// against the runbook passed on the command line, so a resume against an
/// edited runbook is detected even if its `name:` field didn't change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub runbook_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcome: Option<RunOutcome>,
    pub artifact_count: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

impl RunRecord {
    pub fn started(
        run_id: RunId,
        runbook_hash: impl Into<String>,
        artifact_count: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            runbook_hash: runbook_hash.into(),
            started_at,
            finished_at: None,
            outcome: None,
            artifact_count,
            succeeded_count: 0,
            failed_count: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}
