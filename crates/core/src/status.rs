// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-artifact execution status and its transition rules.

use serde::{Deserialize, Serialize};

/// Status of one artifact within one run attempt.
///
/// Transitions are monotonic within a single attempt along
/// `Pending -> Running -> {Succeeded, Failed, Cancelled}`; `Skipped` may
/// replace `Pending` during planning (reuse) or at dispatch time (resume
/// hit, or propagated from an optional dependency's failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
    Cancelled,
}

crate::simple_display! {
    ArtifactStatus {
        Pending => "pending",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
        Skipped => "skipped",
        Cancelled => "cancelled",
    }
}

impl ArtifactStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ArtifactStatus::Succeeded
                | ArtifactStatus::Failed
                | ArtifactStatus::Skipped
                | ArtifactStatus::Cancelled
        )
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: ArtifactStatus) -> bool {
        use ArtifactStatus::*;
        match (self, next) {
            // Idempotent re-application of the same terminal status is allowed
            // (the executor's reconciliation path may observe a status it
            // already recorded, e.g. after a crash-recovery replay).
            (a, b) if a == b => true,
            (Pending, Running) | (Pending, Skipped) | (Pending, Cancelled) => true,
            (Running, Succeeded) | (Running, Failed) | (Running, Cancelled) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
