// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use waivern_core::{Message, RunId};

use super::{ArtifactStore, ArtifactStoreError};
use crate::key::StorageKey;

/// An in-process [`ArtifactStore`] backed by a map. Used by tests and by
/// one-shot CLI invocations that never resume a prior run.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    messages: RwLock<HashMap<(RunId, StorageKey), Message>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn save(&self, run: RunId, key: &StorageKey, message: &Message) -> Result<(), ArtifactStoreError> {
        self.messages.write().insert((run, key.clone()), message.clone());
        Ok(())
    }

    async fn get(&self, run: RunId, key: &StorageKey) -> Result<Message, ArtifactStoreError> {
        self.messages
            .read()
            .get(&(run, key.clone()))
            .cloned()
            .ok_or_else(|| ArtifactStoreError::NotFound { run, key: key.clone() })
    }

    async fn exists(&self, run: RunId, key: &StorageKey) -> Result<bool, ArtifactStoreError> {
        Ok(self.messages.read().contains_key(&(run, key.clone())))
    }

    async fn delete(&self, run: RunId, key: &StorageKey) -> Result<(), ArtifactStoreError> {
        self.messages.write().remove(&(run, key.clone()));
        Ok(())
    }

    async fn list_keys(&self, run: RunId, prefix: &str) -> Result<Vec<StorageKey>, ArtifactStoreError> {
        let mut keys: Vec<StorageKey> = self
            .messages
            .read()
            .keys()
            .filter(|(r, key)| *r == run && !key.is_system() && key.starts_with(prefix))
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear(&self, run: RunId) -> Result<(), ArtifactStoreError> {
        self.messages.write().retain(|(r, key), _| *r != run || key.is_system());
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
