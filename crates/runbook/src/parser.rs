// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML parsing and structural validation of a single runbook file.

use waivern_core::ArtifactId;

use crate::env::interpolate_from_process_env;
use crate::error::RunbookError;
use crate::types::{ArtifactDef, ArtifactEntry, Runbook};

/// Parse one runbook document: expand `${VAR}` placeholders against the
/// process environment, parse the result as YAML, then check the
/// structural rules that don't require resolving includes.
pub fn parse(content: &str) -> Result<Runbook, RunbookError> {
    let expanded = interpolate_from_process_env(content)?;
    let runbook: Runbook = serde_yaml::from_str(&expanded)?;
    validate_structure(&runbook)?;
    Ok(runbook)
}

/// Checks that don't need the merged (post-include) artifact set: every
/// regular artifact declares exactly one of `source`/`inputs`, `merge` is
/// present iff more than one producer is fanned in, and every dependency
/// named by an artifact resolves to another artifact declared in the same
/// runbook.
fn validate_structure(runbook: &Runbook) -> Result<(), RunbookError> {
    for (id, entry) in &runbook.artifacts {
        let ArtifactEntry::Def(def) = entry else { continue };
        validate_def(id, def)?;

        for dependency in def.dependencies() {
            if !runbook.artifacts.contains_key(dependency) {
                return Err(RunbookError::UnknownDependency {
                    artifact: id.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_def(id: &ArtifactId, def: &ArtifactDef) -> Result<(), RunbookError> {
    match (&def.source, &def.inputs) {
        (Some(_), Some(_)) => return Err(RunbookError::SourceAndInputs(id.clone())),
        (None, None) => return Err(RunbookError::MissingComponent(id.clone())),
        (Some(_), None) => {}
        (None, Some(inputs)) => {
            if def.process.is_none() {
                return Err(RunbookError::InputsWithoutProcess(id.clone()));
            }
            let fan_in = inputs.producers().len() > 1;
            match (fan_in, def.merge) {
                (true, None) => return Err(RunbookError::FanInWithoutMerge(id.clone())),
                (false, Some(_)) => return Err(RunbookError::MergeWithoutFanIn(id.clone())),
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
