// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine-wide error taxonomy.

use crate::id::ArtifactId;
use crate::schema::Schema;

/// Errors that can terminate a run or one artifact within a run.
///
/// Each variant corresponds to one failure class in the error handling
/// design: configuration and wiring errors are surfaced before any
/// artifact runs, while the rest are raised while a run is in flight and
/// are attached to the artifact that produced them.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid runbook configuration: {0}")]
    Config(String),

    #[error("unknown component {kind} {name:?}")]
    UnknownComponent { kind: &'static str, name: String },

    #[error("dependency cycle detected: {0}")]
    Cycle(String),

    #[error("no compatible schema between producer output {producer_output:?} and consumer {consumer:?} accepted schemas")]
    SchemaIncompatibility { producer_output: Schema, consumer: ArtifactId },

    #[error("artifact {0} was marked reused but no prior artifact of that id exists in storage")]
    MissingReusedArtifact(ArtifactId),

    #[error("artifact {0} not found")]
    ArtifactNotFound(ArtifactId),

    #[error("source {artifact} failed: {source}")]
    Source {
        artifact: ArtifactId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("processor {artifact} failed: {source}")]
    Processor {
        artifact: ArtifactId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("artifact {0} is corrupt in storage")]
    CorruptArtifact(ArtifactId),

    #[error("run was cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// The artifact this error should be attached to, if any. Config,
    /// unknown-component, and cycle errors are run-level and precede any
    /// artifact entering `Running`, so they have no attachment point.
    pub fn artifact(&self) -> Option<&ArtifactId> {
        match self {
            EngineError::SchemaIncompatibility { consumer, .. } => Some(consumer),
            EngineError::MissingReusedArtifact(id) => Some(id),
            EngineError::ArtifactNotFound(id) => Some(id),
            EngineError::Source { artifact, .. } => Some(artifact),
            EngineError::Processor { artifact, .. } => Some(artifact),
            EngineError::CorruptArtifact(id) => Some(id),
            _ => None,
        }
    }

    /// The process exit code this error maps to: configuration
    /// and planning failures are `1`, in-flight execution failures are
    /// `2`, cancellation (including timeout) is `3`, and invariant
    /// violations are `4`.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Config(_) | EngineError::UnknownComponent { .. } | EngineError::Cycle(_) => 1,
            EngineError::Cancelled => 3,
            EngineError::Internal(_) => 4,
            _ => 2,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
