// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hashing a runbook's raw source text for resume comparison: a resume
//! against an edited file should be rejected even when the file's `name:`
//! field didn't change.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A short, stable digest of `source`, the runbook file's raw (pre-include,
/// pre-interpolation) text. Not cryptographic: this only needs to detect
/// accidental edits between a run and its resume, not resist tampering.
pub fn content_hash(source: &str) -> String {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
