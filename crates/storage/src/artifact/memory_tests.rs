// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use waivern_core::{MessageContent, Schema, Version};

fn sample_message() -> Message {
    Message::new("m1", Schema::new("raw", Version::new(1, 0, 0)), MessageContent::Text("hi".into()))
}

fn key(s: &str) -> StorageKey {
    StorageKey::new(s).unwrap()
}

#[tokio::test]
async fn save_then_get_roundtrips() {
    let store = InMemoryArtifactStore::new();
    let run = RunId::new();
    store.save(run, &key("raw_logs"), &sample_message()).await.unwrap();
    let loaded = store.get(run, &key("raw_logs")).await.unwrap();
    assert_eq!(loaded, sample_message());
}

#[tokio::test]
async fn get_missing_artifact_is_not_found() {
    let store = InMemoryArtifactStore::new();
    let run = RunId::new();
    let err = store.get(run, &key("raw_logs")).await.unwrap_err();
    assert!(matches!(err, ArtifactStoreError::NotFound { .. }));
}

#[tokio::test]
async fn exists_reflects_prior_writes() {
    let store = InMemoryArtifactStore::new();
    let run = RunId::new();
    assert!(!store.exists(run, &key("raw_logs")).await.unwrap());
    store.save(run, &key("raw_logs"), &sample_message()).await.unwrap();
    assert!(store.exists(run, &key("raw_logs")).await.unwrap());
}

#[tokio::test]
async fn different_runs_are_isolated() {
    let store = InMemoryArtifactStore::new();
    let run_a = RunId::new();
    let run_b = RunId::new();
    store.save(run_a, &key("raw_logs"), &sample_message()).await.unwrap();
    assert!(!store.exists(run_b, &key("raw_logs")).await.unwrap());
}

#[tokio::test]
async fn delete_removes_the_entry_and_is_idempotent() {
    let store = InMemoryArtifactStore::new();
    let run = RunId::new();
    store.save(run, &key("raw_logs"), &sample_message()).await.unwrap();
    store.delete(run, &key("raw_logs")).await.unwrap();
    assert!(!store.exists(run, &key("raw_logs")).await.unwrap());
    store.delete(run, &key("raw_logs")).await.unwrap();
}

#[tokio::test]
async fn list_keys_filters_by_prefix_and_excludes_system_namespace() {
    let store = InMemoryArtifactStore::new();
    let run = RunId::new();
    store.save(run, &key("a"), &sample_message()).await.unwrap();
    store.save(run, &key("stage/b"), &sample_message()).await.unwrap();
    store.save(run, &key("stage/c"), &sample_message()).await.unwrap();
    store.save(run, &key("_system/state"), &sample_message()).await.unwrap();

    let mut all = store.list_keys(run, "").await.unwrap();
    all.sort();
    assert_eq!(all, vec![key("a"), key("stage/b"), key("stage/c")]);

    let mut nested = store.list_keys(run, "stage").await.unwrap();
    nested.sort();
    assert_eq!(nested, vec![key("stage/b"), key("stage/c")]);
}

#[tokio::test]
async fn clear_removes_all_non_system_entries_for_that_run_only() {
    let store = InMemoryArtifactStore::new();
    let run_a = RunId::new();
    let run_b = RunId::new();
    store.save(run_a, &key("a"), &sample_message()).await.unwrap();
    store.save(run_a, &key("_system/state"), &sample_message()).await.unwrap();
    store.save(run_b, &key("a"), &sample_message()).await.unwrap();

    store.clear(run_a).await.unwrap();

    assert!(!store.exists(run_a, &key("a")).await.unwrap());
    assert!(store.exists(run_a, &key("_system/state")).await.unwrap());
    assert!(store.exists(run_b, &key("a")).await.unwrap());
}
