// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn substitutes_known_variables() {
    let vars = vars(&[("NAME", "crate")]);
    let out = interpolate("hello ${NAME}", |k| vars.get(k).cloned()).unwrap();
    assert_eq!(out, "hello crate");
}

#[test]
fn falls_back_to_default_when_unset() {
    let out = interpolate("value: ${MISSING:-fallback}", |_| None).unwrap();
    assert_eq!(out, "value: fallback");
}

#[test]
fn errors_on_undefined_variable_with_no_default() {
    let err = interpolate("value: ${MISSING}", |_| None).unwrap_err();
    assert_eq!(err.0, "MISSING");
}

#[test]
fn leaves_non_placeholder_text_untouched() {
    let out = interpolate("plain text, no vars here", |_| None).unwrap();
    assert_eq!(out, "plain text, no vars here");
}

#[test]
fn expands_multiple_placeholders_in_order() {
    let vars = vars(&[("A", "1"), ("B", "2")]);
    let out = interpolate("${A}-${B}", |k| vars.get(k).cloned()).unwrap();
    assert_eq!(out, "1-2");
}
