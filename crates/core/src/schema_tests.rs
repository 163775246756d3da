// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_and_displays_version() {
    let v: Version = "1.2.3".parse().unwrap();
    assert_eq!(v, Version::new(1, 2, 3));
    assert_eq!(v.to_string(), "1.2.3");
}

#[test]
fn rejects_malformed_version() {
    assert!("1.2".parse::<Version>().is_err());
    assert!("1.2.3.4".parse::<Version>().is_err());
    assert!("a.b.c".parse::<Version>().is_err());
}

#[test]
fn compatibility_requires_same_name_and_major() {
    let a = Schema::parse("indicator", "1.0.0").unwrap();
    let b = Schema::parse("indicator", "1.3.0").unwrap();
    let c = Schema::parse("indicator", "2.0.0").unwrap();
    let d = Schema::parse("other", "1.0.0").unwrap();
    assert!(a.is_compatible_with(&b));
    assert!(!a.is_compatible_with(&c));
    assert!(!a.is_compatible_with(&d));
}

#[test]
fn pick_compatible_prefers_highest_minor_patch() {
    let candidates = vec![
        Schema::parse("standard_input", "1.0.0").unwrap(),
        Schema::parse("standard_input", "1.2.0").unwrap(),
        Schema::parse("standard_input", "2.0.0").unwrap(),
    ];
    let accepted = vec![Schema::parse("standard_input", "1.0.0").unwrap()];
    let picked = pick_compatible(&candidates, &accepted).unwrap();
    assert_eq!(picked.version, Version::new(1, 2, 0));
}

#[test]
fn pick_compatible_returns_none_when_no_candidate_matches() {
    let candidates = vec![Schema::parse("a", "1.0.0").unwrap()];
    let accepted = vec![Schema::parse("b", "1.0.0").unwrap()];
    assert!(pick_compatible(&candidates, &accepted).is_none());
}

#[test]
fn pick_default_output_uses_smallest_name_highest_version() {
    let outputs = vec![
        Schema::parse("zeta", "1.0.0").unwrap(),
        Schema::parse("alpha", "1.0.0").unwrap(),
        Schema::parse("alpha", "2.0.0").unwrap(),
    ];
    let picked = pick_default_output(&outputs).unwrap();
    assert_eq!(picked.name, "alpha");
    assert_eq!(picked.version, Version::new(2, 0, 0));
}
