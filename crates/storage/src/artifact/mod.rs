// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-addressed storage for artifact [`Message`]s, keyed by run and a
//! hierarchical [`StorageKey`].

mod filesystem;
mod memory;

pub use filesystem::FilesystemArtifactStore;
pub use memory::InMemoryArtifactStore;

use async_trait::async_trait;
use waivern_core::{Message, RunId};

use crate::key::StorageKey;

/// Errors from reading or writing an artifact's content.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("key {key} not found for run {run}")]
    NotFound { run: RunId, key: StorageKey },

    #[error("key {key} content in run {run} is corrupt: {reason}")]
    Corrupt { run: RunId, key: StorageKey, reason: String },

    #[error("storage I/O error: {0}")]
    Io(String),
}

/// Durable storage for artifact content, keyed by `(run, key)`.
///
/// `key` spans a hierarchical namespace: plain artifact ids, cache
/// entries under `cache/<hash>`, and reserved system state under a
/// `_`-prefixed first segment. `list_keys` and `clear` both exclude that
/// reserved namespace so they can never observe or destroy it.
///
/// Implementations must make [`ArtifactStore::save`] atomic: a concurrent
/// [`ArtifactStore::get`] must never observe a partially written value.
#[async_trait]
pub trait ArtifactStore: Send + Sync + 'static {
    async fn save(&self, run: RunId, key: &StorageKey, message: &Message) -> Result<(), ArtifactStoreError>;

    async fn get(&self, run: RunId, key: &StorageKey) -> Result<Message, ArtifactStoreError>;

    async fn exists(&self, run: RunId, key: &StorageKey) -> Result<bool, ArtifactStoreError>;

    async fn delete(&self, run: RunId, key: &StorageKey) -> Result<(), ArtifactStoreError>;

    /// Keys under `run` whose first segment matches `prefix` (or all
    /// non-reserved keys when `prefix` is empty), excluding the reserved
    /// `_`-prefixed namespace, sorted.
    async fn list_keys(&self, run: RunId, prefix: &str) -> Result<Vec<StorageKey>, ArtifactStoreError>;

    /// Remove every non-reserved key stored for `run`, leaving any
    /// `_`-prefixed system state untouched.
    async fn clear(&self, run: RunId) -> Result<(), ArtifactStoreError>;
}
