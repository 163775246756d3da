// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The parsed shape of a runbook.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use waivern_core::{ArtifactId, RunId};

/// How a processor combines more than one upstream message on a single
/// input slot. `Concatenate` is the only strategy the
/// engine currently implements; others are rejected at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    Concatenate,
}

/// An artifact's `inputs:` field: either a single producer id or a list
/// of them (fanned into one slot, combined with `merge:`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputsField {
    Single(ArtifactId),
    Many(Vec<ArtifactId>),
}

impl InputsField {
    /// Every artifact this field depends on, in declaration order.
    pub fn producers(&self) -> Vec<&ArtifactId> {
        match self {
            InputsField::Single(id) => vec![id],
            InputsField::Many(ids) => ids.iter().collect(),
        }
    }
}

/// What kind of component an artifact instantiates. Derived from whether
/// `source` or `process`/`inputs` is present, never parsed directly off
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Source,
    Processor,
}

waivern_core::simple_display! {
    ComponentKind {
        Source => "source",
        Processor => "processor",
    }
}

/// A `source:`/`process:` block: the component type name plus its raw
/// (pre-interpolation-resolved) configuration mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub properties: serde_json::Value,
}

/// Copies a specific artifact's content from a specific prior run instead
/// of recomputing it. Unlike automatic resume-skip (which only applies
/// under the same run id), this is an explicit, always-active directive
/// that may reach into a different run and a different artifact id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReuseDef {
    pub from_run: RunId,
    pub artifact: ArtifactId,
}

/// One artifact's declaration: what produces it, from what inputs, and
/// whether a prior run's result may stand in for recomputing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArtifactDef {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Present for a source artifact, mutually exclusive with `inputs`.
    #[serde(default)]
    pub source: Option<ComponentSpec>,

    /// Present for a processor artifact, mutually exclusive with `source`.
    #[serde(default)]
    pub inputs: Option<InputsField>,

    /// Present for a processor artifact.
    #[serde(default)]
    pub process: Option<ComponentSpec>,

    /// Required when `inputs` names more than one producer.
    #[serde(default)]
    pub merge: Option<MergeStrategy>,

    /// Marks this artifact as one of the runbook's final results rather
    /// than scaffolding for a later stage. Carried through planning for
    /// whatever external reporting consumes a finished run; it has no
    /// effect on scheduling or the store, where every artifact is kept
    /// regardless of this flag.
    #[serde(default)]
    pub output: bool,

    /// Governs what happens when this artifact cannot proceed, either
    /// because its own component call failed or because a required input
    /// slot's producer did not succeed. `true` skips this artifact and
    /// propagates the skip to its dependents while the rest of the run
    /// continues; `false` (default) cancels the whole run. Meaningless
    /// for a source artifact, which has no dependents that could absorb a
    /// skip and whose failure never cancels the run by itself.
    #[serde(default)]
    pub optional: bool,

    /// Copy a specific prior artifact's content instead of recomputing
    /// this one.
    #[serde(default)]
    pub reuse: Option<ReuseDef>,
}

impl ArtifactDef {
    /// Every artifact id this one directly depends on, in declaration
    /// order.
    pub fn dependencies(&self) -> Vec<&ArtifactId> {
        self.inputs.as_ref().map(InputsField::producers).unwrap_or_default()
    }

    pub fn kind(&self) -> Option<ComponentKind> {
        match (&self.source, &self.inputs) {
            (Some(_), None) => Some(ComponentKind::Source),
            (None, Some(_)) => Some(ComponentKind::Processor),
            _ => None,
        }
    }
}

/// A reference to another runbook file inlined in place of this artifact;
/// every artifact id the included runbook declares is prefixed with this
/// artifact's own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeDef {
    pub path: String,
}

/// One entry in a runbook's `artifacts` map: either a regular artifact
/// declaration, or an `include:` directive that inlines another runbook
/// file's artifacts at this position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactEntry {
    Include { include: IncludeDef },
    Def(ArtifactDef),
}

/// Run-wide settings, nested under a runbook's `config:` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Wall-clock budget for the whole run, in seconds; `None` means no
    /// timeout.
    #[serde(default)]
    pub timeout: Option<u64>,

    #[serde(default = "RunConfig::default_max_concurrency")]
    pub max_concurrency: usize,
}

impl RunConfig {
    fn default_max_concurrency() -> usize {
        10
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { timeout: None, max_concurrency: Self::default_max_concurrency() }
    }
}

/// A fully parsed runbook, before include resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runbook {
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub contact: Option<String>,

    #[serde(default)]
    pub config: RunConfig,

    pub artifacts: IndexMap<ArtifactId, ArtifactEntry>,
}
