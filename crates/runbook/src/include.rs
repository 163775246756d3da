// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolving `include:` entries: recursively load the referenced runbook,
//! prefix every one of its artifact ids with the include site's own id,
//! and splice the result into the parent's artifact map in place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use waivern_core::ArtifactId;

use crate::error::RunbookError;
use crate::parser::parse;
use crate::types::{ArtifactDef, ArtifactEntry, InputsField, ReuseDef, Runbook};

/// Load `path` and recursively inline every `include:` entry it declares
/// (directly or transitively), producing one flattened [`Runbook`] whose
/// `artifacts` map contains only [`ArtifactEntry::Def`] entries.
///
/// `visiting` tracks the canonicalized paths currently being loaded along
/// the current include chain; revisiting one of them is a cycle.
pub fn load(path: &Path) -> Result<Runbook, RunbookError> {
    let mut visiting = HashSet::new();
    load_inner(path, &mut visiting)
}

fn load_inner(path: &Path, visiting: &mut HashSet<PathBuf>) -> Result<Runbook, RunbookError> {
    let canonical = canonicalize_for_cycle_check(path)?;
    if !visiting.insert(canonical.clone()) {
        return Err(RunbookError::IncludeCycle(canonical.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| RunbookError::IncludeIo {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut runbook = parse(&content)?;

    let entries = std::mem::take(&mut runbook.artifacts);
    let mut resolved = IndexMap::new();
    for (id, entry) in entries {
        match entry {
            ArtifactEntry::Def(def) => {
                resolved.insert(id, ArtifactEntry::Def(def));
            }
            ArtifactEntry::Include { include } => {
                let include_path = path
                    .parent()
                    .map(|parent| parent.join(&include.path))
                    .unwrap_or_else(|| PathBuf::from(&include.path));
                let child = load_inner(&include_path, visiting)?;
                for (child_id, child_def) in prefix_artifacts(&id, child)? {
                    resolved.insert(child_id, ArtifactEntry::Def(child_def));
                }
            }
        }
    }
    runbook.artifacts = resolved;

    visiting.remove(&canonical);
    Ok(runbook)
}

/// Prefix every artifact id declared by `child` (and every reference to
/// one of them) with `site`, the id of the `include:` entry that pulled
/// `child` in.
fn prefix_artifacts(
    site: &ArtifactId,
    child: Runbook,
) -> Result<Vec<(ArtifactId, ArtifactDef)>, RunbookError> {
    let rename = |id: &ArtifactId| -> Result<ArtifactId, RunbookError> { Ok(ArtifactId::prefixed(site.as_str(), id)?) };

    let mut renamed = Vec::with_capacity(child.artifacts.len());
    for (id, entry) in child.artifacts {
        // Nested includes are already resolved by the recursive call in
        // `load_inner`, so every entry here is a `Def`.
        let ArtifactEntry::Def(mut def) = entry else {
            unreachable!("load_inner resolves includes before returning");
        };
        let new_id = rename(&id)?;
        if let Some(inputs) = def.inputs.take() {
            def.inputs = Some(rename_inputs(&inputs, &rename)?);
        }
        if let Some(reuse) = def.reuse.take() {
            def.reuse = Some(ReuseDef { from_run: reuse.from_run, artifact: rename(&reuse.artifact)? });
        }
        renamed.push((new_id, def));
    }
    Ok(renamed)
}

fn rename_inputs(
    inputs: &InputsField,
    rename: &impl Fn(&ArtifactId) -> Result<ArtifactId, RunbookError>,
) -> Result<InputsField, RunbookError> {
    Ok(match inputs {
        InputsField::Single(id) => InputsField::Single(rename(id)?),
        InputsField::Many(ids) => InputsField::Many(ids.iter().map(rename).collect::<Result<Vec<_>, _>>()?),
    })
}

/// Best-effort canonicalization for cycle detection: falls back to the
/// unmodified path when the file doesn't exist yet (surfaced later as an
/// I/O error when actually read).
fn canonicalize_for_cycle_check(path: &Path) -> Result<PathBuf, RunbookError> {
    Ok(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
}

#[cfg(test)]
#[path = "include_tests.rs"]
mod tests;
