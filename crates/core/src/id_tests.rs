// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn accepts_lowercase_snake_ids() {
    assert!(ArtifactId::new("source_a").is_ok());
    assert!(ArtifactId::new("b2").is_ok());
}

#[test]
fn rejects_leading_digit() {
    assert!(ArtifactId::new("2b").is_err());
}

#[test]
fn rejects_uppercase_and_hyphens() {
    assert!(ArtifactId::new("Source").is_err());
    assert!(ArtifactId::new("source-a").is_err());
}

#[test]
fn rejects_empty() {
    assert!(ArtifactId::new("").is_err());
}

#[test]
fn prefixed_joins_with_double_underscore() {
    let suffix = ArtifactId::new("inner").unwrap();
    let prefixed = ArtifactId::prefixed("outer", &suffix).unwrap();
    assert_eq!(prefixed.as_str(), "outer__inner");
}

#[test]
fn run_id_roundtrips() {
    let id = RunId::new();
    let s = id.to_string();
    let parsed: RunId = s.parse().unwrap();
    assert_eq!(id, parsed);
}
