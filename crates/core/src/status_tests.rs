// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn pending_can_advance_to_running_skipped_or_cancelled() {
    assert!(ArtifactStatus::Pending.can_transition_to(ArtifactStatus::Running));
    assert!(ArtifactStatus::Pending.can_transition_to(ArtifactStatus::Skipped));
    assert!(ArtifactStatus::Pending.can_transition_to(ArtifactStatus::Cancelled));
    assert!(!ArtifactStatus::Pending.can_transition_to(ArtifactStatus::Succeeded));
    assert!(!ArtifactStatus::Pending.can_transition_to(ArtifactStatus::Failed));
}

#[test]
fn running_can_only_reach_terminal_outcomes() {
    assert!(ArtifactStatus::Running.can_transition_to(ArtifactStatus::Succeeded));
    assert!(ArtifactStatus::Running.can_transition_to(ArtifactStatus::Failed));
    assert!(ArtifactStatus::Running.can_transition_to(ArtifactStatus::Cancelled));
    assert!(!ArtifactStatus::Running.can_transition_to(ArtifactStatus::Pending));
    assert!(!ArtifactStatus::Running.can_transition_to(ArtifactStatus::Skipped));
}

#[test]
fn terminal_statuses_reject_further_transitions() {
    for terminal in [
        ArtifactStatus::Succeeded,
        ArtifactStatus::Failed,
        ArtifactStatus::Skipped,
        ArtifactStatus::Cancelled,
    ] {
        assert!(terminal.is_terminal());
        assert!(!terminal.can_transition_to(ArtifactStatus::Running));
    }
}

#[test]
fn reapplying_the_same_status_is_allowed() {
    assert!(ArtifactStatus::Succeeded.can_transition_to(ArtifactStatus::Succeeded));
    assert!(ArtifactStatus::Running.can_transition_to(ArtifactStatus::Running));
}

#[test]
fn display_matches_snake_case_serde_form() {
    assert_eq!(ArtifactStatus::Succeeded.to_string(), "succeeded");
    let json = serde_json::to_string(&ArtifactStatus::Succeeded).unwrap();
    assert_eq!(json, "\"succeeded\"");
}
