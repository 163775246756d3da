// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use waivern_core::{Message, RunId};

use super::{ArtifactStore, ArtifactStoreError};
use crate::atomic::write_atomic;
use crate::key::StorageKey;

/// A JSON-on-disk [`ArtifactStore`], one file per `(run, key)` under
/// `root/runs/<run_id>/<key>.json`, written atomically. A key containing
/// `/` segments becomes nested subdirectories.
pub struct FilesystemArtifactStore {
    root: PathBuf,
}

impl FilesystemArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run_dir(&self, run: RunId) -> PathBuf {
        self.root.join("runs").join(run.to_string())
    }

    fn path_for(&self, run: RunId, key: &StorageKey) -> PathBuf {
        self.run_dir(run).join(format!("{}.json", key.as_str()))
    }
}

fn io_err(e: std::io::Error) -> ArtifactStoreError {
    ArtifactStoreError::Io(e.to_string())
}

/// Recursively collect every file under `dir`, relative to `base`, with
/// its `.json` suffix stripped.
fn collect_keys<'a>(
    dir: PathBuf,
    base: &'a Path,
    out: &'a mut Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                collect_keys(path, base, out).await?;
            } else if file_type.is_file() {
                if let Some(rel) = path.strip_prefix(base).ok().and_then(|p| p.to_str()) {
                    if let Some(stripped) = rel.strip_suffix(".json") {
                        out.push(stripped.replace(std::path::MAIN_SEPARATOR, "/"));
                    }
                }
            }
        }
        Ok(())
    })
}

#[async_trait]
impl ArtifactStore for FilesystemArtifactStore {
    async fn save(&self, run: RunId, key: &StorageKey, message: &Message) -> Result<(), ArtifactStoreError> {
        let path = self.path_for(run, key);
        let bytes = serde_json::to_vec(message).map_err(|e| ArtifactStoreError::Io(e.to_string()))?;
        write_atomic(&path, &bytes).await.map_err(io_err)
    }

    async fn get(&self, run: RunId, key: &StorageKey) -> Result<Message, ArtifactStoreError> {
        let path = self.path_for(run, key);
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactStoreError::NotFound { run, key: key.clone() }
            } else {
                ArtifactStoreError::Io(e.to_string())
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ArtifactStoreError::Corrupt {
            run,
            key: key.clone(),
            reason: e.to_string(),
        })
    }

    async fn exists(&self, run: RunId, key: &StorageKey) -> Result<bool, ArtifactStoreError> {
        tokio::fs::try_exists(self.path_for(run, key)).await.map_err(io_err)
    }

    async fn delete(&self, run: RunId, key: &StorageKey) -> Result<(), ArtifactStoreError> {
        match tokio::fs::remove_file(self.path_for(run, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(e)),
        }
    }

    async fn list_keys(&self, run: RunId, prefix: &str) -> Result<Vec<StorageKey>, ArtifactStoreError> {
        let base = self.run_dir(run);
        if !tokio::fs::try_exists(&base).await.map_err(io_err)? {
            return Ok(Vec::new());
        }
        let mut raw = Vec::new();
        collect_keys(base.clone(), &base, &mut raw).await.map_err(io_err)?;

        let mut keys: Vec<StorageKey> = raw
            .into_iter()
            .filter(|k| !k.split('/').next().is_some_and(|first| first.starts_with('_')))
            .filter(|k| prefix.is_empty() || *k == prefix || k.starts_with(&format!("{prefix}/")))
            .filter_map(|k| StorageKey::new(k).ok())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear(&self, run: RunId) -> Result<(), ArtifactStoreError> {
        let base = self.run_dir(run);
        let mut entries = match tokio::fs::read_dir(&base).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_err(e)),
        };
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('_') {
                continue;
            }
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(io_err)?;
            let result =
                if file_type.is_dir() { tokio::fs::remove_dir_all(&path).await } else { tokio::fs::remove_file(&path).await };
            result.map_err(io_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;
