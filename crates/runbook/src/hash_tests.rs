// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn same_content_hashes_the_same() {
    assert_eq!(content_hash("name: a\n"), content_hash("name: a\n"));
}

#[test]
fn different_content_hashes_differently() {
    assert_ne!(content_hash("name: a\n"), content_hash("name: b\n"));
}
