// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file writes shared by the filesystem backends.

use std::path::Path;

/// Write `bytes` to `path` atomically: write to a sibling `.tmp` file, then
/// rename over the destination. A reader can never observe a partially
/// written file, even if the process crashes mid-write.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp_path = path.with_extension(match path.extension() {
        Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
        None => "tmp".to_string(),
    });
    tokio::fs::write(&tmp_path, bytes).await?;
    tokio::fs::rename(&tmp_path, path).await
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
