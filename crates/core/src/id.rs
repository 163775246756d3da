// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run and artifact identifiers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

crate::define_uuid_id! {
    /// Unique identifier for one execution attempt of a plan.
    pub struct RunId;
}

#[allow(clippy::expect_used)]
static ARTIFACT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("constant regex pattern is valid"));

/// An author-chosen artifact identifier, unique within a runbook.
///
/// Unlike [`RunId`], this is not a generated ID: it comes verbatim from a
/// runbook's `artifacts` map key (or from include-site prefixing during
/// planning), so it is modeled as a validated string newtype rather than a
/// fixed-size generated-ID buffer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

/// The artifact id did not match `[a-z][a-z0-9_]*`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid artifact id {0:?}: must match [a-z][a-z0-9_]*")]
pub struct InvalidArtifactId(pub String);

impl ArtifactId {
    /// Validate and wrap a string as an artifact id.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidArtifactId> {
        let s = s.into();
        if ARTIFACT_ID_PATTERN.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidArtifactId(s))
        }
    }

    /// Build an id by prefixing another id with an include-site segment,
    /// joined with `__` (used when the planner inlines a child runbook).
    ///
    /// The result is re-validated: both `prefix` and `suffix` are already
    /// valid artifact ids, and `__` contains no characters outside the
    /// allowed alphabet, so this cannot fail in practice, but callers
    /// should not assume `Self` names are statically well-formed.
    pub fn prefixed(prefix: &str, suffix: &ArtifactId) -> Result<Self, InvalidArtifactId> {
        Self::new(format!("{prefix}__{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for ArtifactId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = InvalidArtifactId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ArtifactId {
    type Error = InvalidArtifactId;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
