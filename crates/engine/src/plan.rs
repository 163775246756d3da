// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turning a resolved [`Runbook`] into an [`ExecutionPlan`]: a cycle-free
//! dependency graph in deterministic topological order, with every
//! artifact's component already instantiated, its produced schema already
//! resolved, and every `reuse:` target already confirmed to exist.
//!
//! Everything here runs before the run is recorded in the state store: a
//! runbook that names an unknown component, wires incompatible schemas
//! together, or reuses an artifact that was never produced fails here,
//! with no `RunRecord` ever created for it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use indexmap::IndexMap;
use waivern_core::{ArtifactId, EngineError, EngineResult, Processor, Schema, Source};
use waivern_registry::Registry;
use waivern_runbook::{ArtifactDef, ArtifactEntry, MergeStrategy, ReuseDef, Runbook};
use waivern_storage::{ArtifactStore, StorageKey};

/// The instantiated component behind one planned artifact.
#[derive(Clone)]
pub enum PlannedComponent {
    Source(Arc<dyn Source>),
    Processor { component: Arc<dyn Processor>, producers: Vec<ArtifactId>, merge: Option<MergeStrategy> },
}

impl std::fmt::Debug for PlannedComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannedComponent::Source(_) => f.debug_tuple("Source").finish(),
            PlannedComponent::Processor { producers, merge, .. } => f
                .debug_struct("Processor")
                .field("producers", producers)
                .field("merge", merge)
                .finish(),
        }
    }
}

/// One artifact as the planner sees it: its instantiated component, the
/// exact schema it will produce, and the declarative flags that govern
/// scheduling.
#[derive(Debug, Clone)]
pub struct PlannedArtifact {
    pub id: ArtifactId,
    pub component: PlannedComponent,
    pub output_schema: Schema,
    pub optional: bool,
    pub output: bool,
    pub reuse: Option<ReuseDef>,
}

impl PlannedArtifact {
    pub fn producers(&self) -> &[ArtifactId] {
        match &self.component {
            PlannedComponent::Source(_) => &[],
            PlannedComponent::Processor { producers, .. } => producers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub artifacts: IndexMap<ArtifactId, PlannedArtifact>,
    /// A valid topological order, ties broken lexicographically by id.
    pub topo_order: Vec<ArtifactId>,
}

impl ExecutionPlan {
    pub fn dependents_of<'a>(&'a self, id: &ArtifactId) -> Vec<&'a ArtifactId> {
        self.artifacts
            .iter()
            .filter(|(_, art)| art.producers().contains(id))
            .map(|(candidate, _)| candidate)
            .collect()
    }
}

/// Build a deterministic execution plan from a fully-resolved runbook
/// (includes already inlined): a cycle-free topological order, with every
/// artifact's component resolved against `registry`, its output schema
/// settled, and every `reuse:` target confirmed present in
/// `artifact_store`. Fails before any state-store interaction.
pub async fn build_plan(
    runbook: &Runbook,
    registry: &Registry,
    artifact_store: &dyn ArtifactStore,
) -> EngineResult<ExecutionPlan> {
    let defs = defs_by_id(runbook)?;
    let order = topo_order(&defs)?;

    let mut artifacts: IndexMap<ArtifactId, PlannedArtifact> = IndexMap::new();
    for id in &order {
        let def = defs.get(id).expect("topo_order only names declared artifacts");
        let planned = plan_artifact(id, def, &artifacts, registry, artifact_store).await?;
        artifacts.insert(id.clone(), planned);
    }

    Ok(ExecutionPlan { artifacts, topo_order: order })
}

fn defs_by_id(runbook: &Runbook) -> EngineResult<BTreeMap<&ArtifactId, &ArtifactDef>> {
    let mut defs = BTreeMap::new();
    for (id, entry) in &runbook.artifacts {
        match entry {
            ArtifactEntry::Def(def) => {
                defs.insert(id, def);
            }
            ArtifactEntry::Include { .. } => {
                return Err(EngineError::Config(format!("artifact {id} has an unresolved include")));
            }
        }
    }
    Ok(defs)
}

fn topo_order(defs: &BTreeMap<&ArtifactId, &ArtifactDef>) -> EngineResult<Vec<ArtifactId>> {
    let mut indegree: BTreeMap<ArtifactId, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<ArtifactId, Vec<ArtifactId>> = BTreeMap::new();

    for id in defs.keys() {
        indegree.entry((*id).clone()).or_insert(0);
    }

    for (id, def) in defs {
        for dep in def.dependencies() {
            if !defs.contains_key(dep) {
                return Err(EngineError::Config(format!("artifact {id} depends on unknown artifact {dep}")));
            }
            *indegree.get_mut(*id).expect("seeded above") += 1;
            dependents.entry(dep.clone()).or_default().push((*id).clone());
        }
    }

    let mut remaining = indegree.clone();
    let mut ready: BTreeSet<ArtifactId> =
        indegree.iter().filter(|(_, &d)| d == 0).map(|(id, _)| id.clone()).collect();
    let mut order = Vec::with_capacity(defs.len());

    while let Some(next) = ready.iter().next().cloned() {
        ready.remove(&next);
        order.push(next.clone());
        if let Some(children) = dependents.get(&next) {
            for child in children {
                let entry = remaining.get_mut(child).expect("child was seeded above");
                *entry -= 1;
                if *entry == 0 {
                    ready.insert(child.clone());
                }
            }
        }
    }

    if order.len() != defs.len() {
        let stuck: Vec<String> = remaining.iter().filter(|(_, &d)| d > 0).map(|(id, _)| id.to_string()).collect();
        return Err(EngineError::Cycle(stuck.join(", ")));
    }

    Ok(order)
}

async fn plan_artifact(
    id: &ArtifactId,
    def: &ArtifactDef,
    planned_so_far: &IndexMap<ArtifactId, PlannedArtifact>,
    registry: &Registry,
    artifact_store: &dyn ArtifactStore,
) -> EngineResult<PlannedArtifact> {
    let component = match (&def.source, &def.inputs) {
        (Some(spec), None) => {
            if !registry.has_source(&spec.type_name) {
                return Err(EngineError::UnknownComponent { kind: "source", name: spec.type_name.clone() });
            }
            let source =
                registry.create_source(&spec.type_name, spec.properties.clone()).map_err(|e| EngineError::Config(e.to_string()))?;
            PlannedComponent::Source(Arc::from(source))
        }
        (None, Some(inputs)) => {
            // `validate_structure` already guarantees `process` is present
            // whenever `inputs` is.
            let spec = def.process.as_ref().expect("inputs requires process");
            if !registry.has_processor(&spec.type_name) {
                return Err(EngineError::UnknownComponent { kind: "processor", name: spec.type_name.clone() });
            }
            let processor = registry
                .create_processor(&spec.type_name, spec.properties.clone())
                .map_err(|e| EngineError::Config(e.to_string()))?;
            let component: Arc<dyn Processor> = Arc::from(processor);
            let producers: Vec<ArtifactId> = inputs.producers().into_iter().cloned().collect();
            PlannedComponent::Processor { component, producers, merge: def.merge }
        }
        // Unreachable once the runbook has passed parser validation, but
        // the planner doesn't trust a caller to have run it.
        _ => return Err(EngineError::Config(format!("artifact {id} declares neither source nor inputs"))),
    };

    let output_schema = match &component {
        PlannedComponent::Source(source) => {
            waivern_core::pick_default_output(&source.output_schemas())
                .cloned()
                .ok_or_else(|| EngineError::Config(format!("source for artifact {id} advertises no output schema")))?
        }
        PlannedComponent::Processor { component, producers, merge } => {
            resolve_processor_output(id, component.as_ref(), producers, *merge, planned_so_far)?
        }
    };

    if let Some(reuse) = &def.reuse {
        let key = StorageKey::from(&reuse.artifact);
        let exists = artifact_store
            .exists(reuse.from_run, &key)
            .await
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        if !exists {
            return Err(EngineError::MissingReusedArtifact(id.clone()));
        }
    }

    Ok(PlannedArtifact {
        id: id.clone(),
        component,
        output_schema,
        optional: def.optional,
        output: def.output,
        reuse: def.reuse.clone(),
    })
}

/// Resolve the schema a processor will produce for this artifact: its
/// producers' already-resolved output schemas must match one of the
/// processor's single-slot `input_requirements()` alternatives (this
/// runbook format always delivers exactly one logical message to
/// `process` — either one producer's message, or several producers'
/// messages already concatenated under `merge: concatenate`), and the
/// processor's own declared output then picks its deterministic default.
fn resolve_processor_output(
    id: &ArtifactId,
    processor: &dyn Processor,
    producers: &[ArtifactId],
    merge: Option<MergeStrategy>,
    planned_so_far: &IndexMap<ArtifactId, PlannedArtifact>,
) -> EngineResult<Schema> {
    let mut producer_schemas = Vec::with_capacity(producers.len());
    for producer in producers {
        let planned = planned_so_far
            .get(producer)
            .ok_or_else(|| EngineError::Config(format!("artifact {id} depends on unplanned artifact {producer}")))?;
        producer_schemas.push(planned.output_schema.clone());
    }

    let effective_schema = match merge {
        None => producer_schemas.into_iter().next().ok_or_else(|| {
            EngineError::Config(format!("artifact {id} declares no producers"))
        })?,
        Some(MergeStrategy::Concatenate) => {
            let first = producer_schemas.first().cloned().ok_or_else(|| {
                EngineError::Config(format!("artifact {id} declares merge but no producers"))
            })?;
            if producer_schemas.iter().any(|s| !s.is_compatible_with(&first)) {
                return Err(EngineError::SchemaIncompatibility { producer_output: first, consumer: id.clone() });
            }
            first
        }
    };

    let single_slot_requirement = processor
        .input_requirements()
        .into_iter()
        .find(|alternative| alternative.len() == 1)
        .and_then(|mut alternative| alternative.pop())
        .ok_or_else(|| EngineError::Config(format!("processor for artifact {id} declares no single-input wiring")))?;

    if !single_slot_requirement.accepted_schemas.iter().any(|accepted| accepted.is_compatible_with(&effective_schema)) {
        return Err(EngineError::SchemaIncompatibility { producer_output: effective_schema, consumer: id.clone() });
    }

    waivern_core::pick_default_output(&processor.output_schemas())
        .cloned()
        .ok_or_else(|| EngineError::Config(format!("processor for artifact {id} advertises no output schema")))
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
