// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated storage keys.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use waivern_core::ArtifactId;

#[allow(clippy::expect_used)]
static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_./-]*$").expect("constant regex pattern is valid"));

/// A storage key rejected a filesystem backend's layout would reject, or a
/// raw `..` segment that would escape the run's storage root.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid storage key {0:?}")]
pub struct InvalidKey(pub String);

/// A validated storage key: matches `[A-Za-z0-9_][A-Za-z0-9_./-]*` and
/// contains no `..` path segment, so a filesystem backend can join it onto
/// its storage root without escaping it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidKey> {
        let s = s.into();
        if !KEY_PATTERN.is_match(&s) {
            return Err(InvalidKey(s));
        }
        if s.split('/').any(|segment| segment == "..") {
            return Err(InvalidKey(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key lives under a reserved `_`-prefixed top segment
    /// (e.g. `_system/state.json`), and so is excluded from `list_keys`
    /// and preserved across `clear`.
    pub fn is_system(&self) -> bool {
        self.0.split('/').next().is_some_and(|first| first.starts_with('_'))
    }

    /// True when `self` starts with `prefix` on a `/`-segment boundary
    /// (or is exactly equal to it).
    pub fn starts_with(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return true;
        }
        self.0 == prefix || self.0.starts_with(&format!("{prefix}/"))
    }
}

impl From<&ArtifactId> for StorageKey {
    /// Every artifact id matches `[a-z][a-z0-9_]*`, a strict subset of this
    /// type's alphabet with no path separators or `..` segments possible,
    /// so the conversion cannot fail.
    fn from(id: &ArtifactId) -> Self {
        Self(id.as_str().to_string())
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for StorageKey {
    type Error = InvalidKey;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for StorageKey {
    type Error = InvalidKey;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
