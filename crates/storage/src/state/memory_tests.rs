// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

#[tokio::test]
async fn records_and_reads_back_a_run() {
    let store = InMemoryStateStore::new();
    let run = RunId::new();
    store.record_run_started(RunRecord::started(run, "deadbeef", 2, now())).await.unwrap();
    let record = store.get_run(run).await.unwrap();
    assert_eq!(record.runbook_hash, "deadbeef");
    assert_eq!(record.artifact_count, 2);
    assert!(!record.is_finished());
}

#[tokio::test]
async fn finishing_a_run_sets_outcome_and_timestamp() {
    let store = InMemoryStateStore::new();
    let run = RunId::new();
    store.record_run_started(RunRecord::started(run, "deadbeef", 1, now())).await.unwrap();
    store.record_run_finished(run, RunOutcome::Succeeded, now()).await.unwrap();
    let record = store.get_run(run).await.unwrap();
    assert!(record.is_finished());
    assert_eq!(record.outcome, Some(RunOutcome::Succeeded));
}

#[tokio::test]
async fn finishing_an_unknown_run_is_an_error() {
    let store = InMemoryStateStore::new();
    let err = store.record_run_finished(RunId::new(), RunOutcome::Failed, now()).await.unwrap_err();
    assert!(matches!(err, StateStoreError::RunNotFound(_)));
}

#[tokio::test]
async fn list_runs_is_most_recent_first() {
    let store = InMemoryStateStore::new();
    let first = RunId::new();
    let second = RunId::new();
    store.record_run_started(RunRecord::started(first, "aaaa", 1, now())).await.unwrap();
    store.record_run_started(RunRecord::started(second, "bbbb", 1, now())).await.unwrap();
    let runs = store.list_runs().await.unwrap();
    assert_eq!(runs[0].run_id, second);
    assert_eq!(runs[1].run_id, first);
}

#[tokio::test]
async fn artifact_status_roundtrips_and_seeds_a_resume() {
    let store = InMemoryStateStore::new();
    let run = RunId::new();
    let artifact = ArtifactId::new("raw_logs").unwrap();
    assert_eq!(store.get_artifact_status(run, &artifact).await.unwrap(), None);
    store.set_artifact_status(run, &artifact, ArtifactStatus::Succeeded).await.unwrap();
    assert_eq!(store.get_artifact_status(run, &artifact).await.unwrap(), Some(ArtifactStatus::Succeeded));
    let all = store.all_statuses(run).await.unwrap();
    assert_eq!(all.get(&artifact), Some(&ArtifactStatus::Succeeded));
}

#[tokio::test]
async fn record_run_finished_tallies_succeeded_and_failed_counts() {
    let store = InMemoryStateStore::new();
    let run = RunId::new();
    let ok = ArtifactId::new("ok").unwrap();
    let bad = ArtifactId::new("bad").unwrap();
    store.record_run_started(RunRecord::started(run, "deadbeef", 2, now())).await.unwrap();
    store.set_artifact_status(run, &ok, ArtifactStatus::Succeeded).await.unwrap();
    store.set_artifact_status(run, &bad, ArtifactStatus::Failed).await.unwrap();
    store.record_run_finished(run, RunOutcome::Failed, now()).await.unwrap();
    let record = store.get_run(run).await.unwrap();
    assert_eq!(record.succeeded_count, 1);
    assert_eq!(record.failed_count, 1);
}
