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
async fn save_then_get_roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    store.save(run, &key("raw_logs"), &sample_message()).await.unwrap();
    let loaded = store.get(run, &key("raw_logs")).await.unwrap();
    assert_eq!(loaded, sample_message());
}

#[tokio::test]
async fn save_under_a_nested_key_creates_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    store.save(run, &key("stage/raw_logs"), &sample_message()).await.unwrap();
    let loaded = store.get(run, &key("stage/raw_logs")).await.unwrap();
    assert_eq!(loaded, sample_message());
    assert!(dir.path().join("runs").join(run.to_string()).join("stage").join("raw_logs.json").exists());
}

#[tokio::test]
async fn get_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    let err = store.get(run, &key("raw_logs")).await.unwrap_err();
    assert!(matches!(err, ArtifactStoreError::NotFound { .. }));
}

#[tokio::test]
async fn get_truncated_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    let path = dir.path().join("runs").join(run.to_string()).join("raw_logs.json");
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(&path, b"{not json").await.unwrap();
    let err = store.get(run, &key("raw_logs")).await.unwrap_err();
    assert!(matches!(err, ArtifactStoreError::Corrupt { .. }));
}

#[tokio::test]
async fn exists_reflects_prior_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    assert!(!store.exists(run, &key("raw_logs")).await.unwrap());
    store.save(run, &key("raw_logs"), &sample_message()).await.unwrap();
    assert!(store.exists(run, &key("raw_logs")).await.unwrap());
}

#[tokio::test]
async fn delete_removes_the_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    store.save(run, &key("raw_logs"), &sample_message()).await.unwrap();
    store.delete(run, &key("raw_logs")).await.unwrap();
    assert!(!store.exists(run, &key("raw_logs")).await.unwrap());
    store.delete(run, &key("raw_logs")).await.unwrap();
}

#[tokio::test]
async fn list_keys_finds_nested_entries_and_excludes_system_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
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
async fn clear_removes_all_non_system_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilesystemArtifactStore::new(dir.path());
    let run = RunId::new();
    store.save(run, &key("a"), &sample_message()).await.unwrap();
    store.save(run, &key("stage/b"), &sample_message()).await.unwrap();
    store.save(run, &key("_system/state"), &sample_message()).await.unwrap();

    store.clear(run).await.unwrap();

    assert!(!store.exists(run, &key("a")).await.unwrap());
    assert!(!store.exists(run, &key("stage/b")).await.unwrap());
    assert!(store.exists(run, &key("_system/state")).await.unwrap());
}
