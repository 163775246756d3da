// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::ArtifactId;

#[test]
fn config_level_errors_have_no_artifact_attachment() {
    let err = EngineError::Config("missing field".into());
    assert!(err.artifact().is_none());
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn artifact_level_errors_attach_to_their_artifact() {
    let id = ArtifactId::new("raw_logs").unwrap();
    let err = EngineError::ArtifactNotFound(id.clone());
    assert_eq!(err.artifact(), Some(&id));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn cancelled_maps_to_its_own_exit_code() {
    assert_eq!(EngineError::Cancelled.exit_code(), 3);
}

#[test]
fn internal_errors_map_to_exit_code_four() {
    assert_eq!(EngineError::Internal("unreachable state".into()).exit_code(), 4);
}
