// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use waivern_core::{ArtifactId, InvalidArtifactId};

use crate::env::UndefinedVar;

#[derive(Debug, thiserror::Error)]
pub enum RunbookError {
    #[error("environment interpolation failed: {0}")]
    Env(#[from] UndefinedVar),

    #[error("failed to parse runbook YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid artifact id: {0}")]
    InvalidArtifactId(#[from] InvalidArtifactId),

    #[error("artifact {artifact} depends on unknown artifact {dependency}")]
    UnknownDependency { artifact: ArtifactId, dependency: ArtifactId },

    #[error("artifact {0} declares neither source nor inputs/process")]
    MissingComponent(ArtifactId),

    #[error("artifact {0} declares both source and inputs; exactly one is required")]
    SourceAndInputs(ArtifactId),

    #[error("artifact {0} declares inputs but no process")]
    InputsWithoutProcess(ArtifactId),

    #[error("artifact {0} declares merge but fans in only one producer")]
    MergeWithoutFanIn(ArtifactId),

    #[error("artifact {0} fans in more than one producer but declares no merge strategy")]
    FanInWithoutMerge(ArtifactId),

    #[error("include cycle detected: {0}")]
    IncludeCycle(String),

    #[error("failed to read include {path:?}: {reason}")]
    IncludeIo { path: String, reason: String },
}
