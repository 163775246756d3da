// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema identity and compatibility.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A `MAJOR.MINOR.PATCH` version tag on a [`crate::Schema`].
///
/// Hand-rolled rather than pulled from a general-purpose semver crate:
/// the engine only ever needs to parse, compare, and pick the
/// highest `(minor, patch)` among same-major candidates,
/// which a three-field tuple covers without pre-release/build-metadata
/// machinery this domain never uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// True when both versions share a major number.
    pub fn compatible_major(&self, other: &Version) -> bool {
        self.major == other.major
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A version string was not `MAJOR.MINOR.PATCH` with numeric components.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid schema version {0:?}: expected MAJOR.MINOR.PATCH")]
pub struct InvalidVersion(pub String);

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(InvalidVersion(s.to_string()));
        };
        let parse = |p: &str| p.parse::<u32>().map_err(|_| InvalidVersion(s.to_string()));
        Ok(Version { major: parse(major)?, minor: parse(minor)?, patch: parse(patch)? })
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A `(name, version)` tag identifying a [`crate::Message`]'s shape.
///
/// Two schemas are compatible iff they share a name and a major version
///. Equality is structural: name and full version must match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub version: Version,
}

impl Schema {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self { name: name.into(), version }
    }

    pub fn parse(name: impl Into<String>, version: &str) -> Result<Self, InvalidVersion> {
        Ok(Self { name: name.into(), version: version.parse()? })
    }

    /// Same name, same major version.
    pub fn is_compatible_with(&self, other: &Schema) -> bool {
        self.name == other.name && self.version.compatible_major(&other.version)
    }

    /// Sort key for the "smallest name, highest version" tie-break:
    /// ascending name, then descending version.
    pub fn tie_break_key(&self) -> (&str, Version) {
        (self.name.as_str(), self.version)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Pick the schema the consumer should resolve to from a producer's output
/// schemas (`candidates`) against a consumer's accepted schemas
/// (`accepted`): among all compatible pairs, the highest `(minor, patch)`
/// wins, deterministically.
pub fn pick_compatible<'a>(candidates: &'a [Schema], accepted: &[Schema]) -> Option<&'a Schema> {
    candidates
        .iter()
        .filter(|c| accepted.iter().any(|a| c.is_compatible_with(a)))
        .max_by_key(|c| c.version)
}

/// Pick the deterministic default output schema for a processor that
/// publishes several: smallest name, highest version.
pub fn pick_default_output(outputs: &[Schema]) -> Option<&Schema> {
    outputs.iter().min_by(|a, b| {
        a.name.cmp(&b.name).then_with(|| b.version.cmp(&a.version))
    })
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
