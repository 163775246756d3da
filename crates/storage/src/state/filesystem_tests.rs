// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

#[tokio::test]
async fn records_and_reads_back_a_run_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    let run = RunId::new();
    store.record_run_started(RunRecord::started(run, "deadbeef", 3, now())).await.unwrap();
    let record = store.get_run(run).await.unwrap();
    assert_eq!(record.runbook_hash, "deadbeef");
    assert_eq!(record.artifact_count, 3);
}

#[tokio::test]
async fn get_run_for_unknown_run_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    let err = store.get_run(RunId::new()).await.unwrap_err();
    assert!(matches!(err, StateStoreError::RunNotFound(_)));
}

#[tokio::test]
async fn artifact_status_persists_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();
    let run = RunId::new();
    let artifact = ArtifactId::new("raw_logs").unwrap();
    {
        let store = FilesystemStateStore::new(dir.path());
        store.record_run_started(RunRecord::started(run, "deadbeef", 1, now())).await.unwrap();
        store.set_artifact_status(run, &artifact, ArtifactStatus::Running).await.unwrap();
    }
    let store = FilesystemStateStore::new(dir.path());
    assert_eq!(store.get_artifact_status(run, &artifact).await.unwrap(), Some(ArtifactStatus::Running));
}

#[tokio::test]
async fn list_runs_reads_every_file_in_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    let first = RunId::new();
    let second = RunId::new();
    store.record_run_started(RunRecord::started(first, "aaaa", 1, now())).await.unwrap();
    store
        .record_run_started(RunRecord::started(second, "bbbb", 1, now() + chrono::Duration::seconds(10)))
        .await
        .unwrap();
    let runs = store.list_runs().await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run_id, second);
}

#[tokio::test]
async fn resuming_a_run_id_keeps_previously_recorded_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemStateStore::new(dir.path());
    let run = RunId::new();
    let artifact = ArtifactId::new("raw_logs").unwrap();
    store.record_run_started(RunRecord::started(run, "deadbeef", 2, now())).await.unwrap();
    store.set_artifact_status(run, &artifact, ArtifactStatus::Succeeded).await.unwrap();

    store.record_run_started(RunRecord::started(run, "deadbeef", 2, now())).await.unwrap();

    assert_eq!(store.get_artifact_status(run, &artifact).await.unwrap(), Some(ArtifactStatus::Succeeded));
}
