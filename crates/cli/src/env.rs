// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// Resolve the state directory: `WAIVERN_STATE_DIR` > `XDG_STATE_HOME/waivern` >
/// `~/.local/state/waivern`.
pub fn state_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("WAIVERN_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("waivern"));
    }
    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("cannot resolve state directory: HOME is unset"))?;
    Ok(PathBuf::from(home).join(".local/state/waivern"))
}

/// Resolve the artifact storage root: `WAIVERN_ARTIFACT_DIR`, defaulting to
/// `<state_dir>/artifacts`.
pub fn artifact_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("WAIVERN_ARTIFACT_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(state_dir()?.join("artifacts"))
}
