// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-ordered, bounded-concurrency execution of a plan. Artifacts
//! become eligible to run as soon as every artifact they
//! depend on reaches a terminal status; ties among simultaneously eligible
//! artifacts are broken lexicographically by id so runs are reproducible.
//!
//! Resuming under a `run_id` that already has recorded state is automatic:
//! any artifact already `Succeeded` in the state store is treated as done
//! and never re-dispatched, and its dependents become eligible as if it had
//! just completed. This is distinct from an artifact's own `reuse:` clause,
//! which copies content from a different, named prior run rather than
//! skipping based on this run's own history.
//!
//! Cascade semantics:
//! a processor that cannot proceed — because its own run failed, or
//! because a required input's producer did not succeed — is marked
//! `Skipped`. If that processor is declared `optional: true`, only its
//! own dependents inherit the skip; the rest of the run keeps going. If
//! it is not optional (the default), the whole run is cancelled: every
//! artifact still `Pending` when the dust settles becomes `Cancelled`.
//! A source's own extraction failure never triggers that whole-run
//! cancellation by itself — only a non-optional processor's inability to
//! proceed does.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use waivern_core::{
    ArtifactId, ArtifactStatus, Clock, EngineError, EngineResult, Message, MessageContent, RunId,
};
use waivern_runbook::{MergeStrategy, ReuseDef};
use waivern_storage::{ArtifactStore, RunOutcome, RunRecord, StateStore, StorageKey};

use crate::plan::{ExecutionPlan, PlannedComponent};

/// Run-wide knobs the runbook's `config` block maps onto.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub max_concurrency: usize,
    pub timeout: Option<std::time::Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { max_concurrency: 10, timeout: None }
    }
}

/// The final status of every artifact once the run stops advancing.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: RunId,
    pub statuses: HashMap<ArtifactId, ArtifactStatus>,
    failed: bool,
}

impl RunSummary {
    /// True unless a non-optional processor was unable to proceed and
    /// cancelled the rest of the run. A source's own extraction failure
    /// does not by itself make this false.
    pub fn all_succeeded(&self) -> bool {
        !self.failed
    }
}

/// Why the dispatch loop stopped admitting new work.
enum Halt {
    /// The caller's cancellation token fired, or the run timed out.
    Token,
    /// A non-optional processor could not proceed.
    Failure,
}

/// Executes a plan to completion against the storage backends it was
/// constructed with. The plan itself already carries every component the
/// run needs, instantiated and schema-checked by the planner.
pub struct Executor<C: Clock> {
    artifact_store: Arc<dyn ArtifactStore>,
    state_store: Arc<dyn StateStore>,
    clock: C,
}

impl<C: Clock> Executor<C> {
    pub fn new(artifact_store: Arc<dyn ArtifactStore>, state_store: Arc<dyn StateStore>, clock: C) -> Self {
        Self { artifact_store, state_store, clock }
    }

    /// Run `plan` under `run_id`, recording it in the state store under
    /// `runbook_hash`. Any artifact this `run_id` already recorded as
    /// `Succeeded` is skipped and its dependents unblocked as usual;
    /// an artifact's own `reuse:` clause, if any, is honored regardless.
    #[instrument(skip(self, plan, cancel), fields(run_id = %run_id))]
    pub async fn run(
        &self,
        plan: &ExecutionPlan,
        run_id: RunId,
        runbook_hash: &str,
        config: ExecutorConfig,
        cancel: CancellationToken,
    ) -> EngineResult<RunSummary> {
        let started_at = chrono::DateTime::from_timestamp((self.clock.epoch_ms() / 1000) as i64, 0)
            .unwrap_or_else(chrono::Utc::now);
        self.state_store
            .record_run_started(RunRecord::started(run_id, runbook_hash, plan.artifacts.len(), started_at))
            .await
            .map_err(|e| EngineError::Internal(e.to_string()))?;

        let timeout_guard = config.timeout.map(|timeout| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            })
        });

        let result = self.run_inner(plan, run_id, config, cancel).await;

        if let Some(guard) = timeout_guard {
            guard.abort();
        }

        let finished_at = chrono::DateTime::from_timestamp((self.clock.epoch_ms() / 1000) as i64, 0)
            .unwrap_or_else(chrono::Utc::now);
        let outcome = match &result {
            Ok(summary) if summary.all_succeeded() => RunOutcome::Succeeded,
            Ok(_) => RunOutcome::Failed,
            Err(EngineError::Cancelled) => RunOutcome::Cancelled,
            Err(_) => RunOutcome::Failed,
        };
        self.state_store
            .record_run_finished(run_id, outcome, finished_at)
            .await
            .map_err(|e| EngineError::Internal(e.to_string()))?;

        result
    }

    async fn run_inner(
        &self,
        plan: &ExecutionPlan,
        run_id: RunId,
        config: ExecutorConfig,
        cancel: CancellationToken,
    ) -> EngineResult<RunSummary> {
        let mut indegree: HashMap<ArtifactId, usize> = HashMap::new();
        let mut dependents: HashMap<ArtifactId, Vec<ArtifactId>> = HashMap::new();
        for (id, art) in &plan.artifacts {
            let producers = art.producers();
            indegree.insert(id.clone(), producers.len());
            for producer in producers {
                dependents.entry(producer.clone()).or_default().push(id.clone());
            }
        }

        let mut statuses: HashMap<ArtifactId, ArtifactStatus> =
            plan.artifacts.keys().map(|id| (id.clone(), ArtifactStatus::Pending)).collect();

        let mut ready: BTreeSet<ArtifactId> = BTreeSet::new();
        let previously_succeeded =
            self.state_store.all_statuses(run_id).await.map_err(|e| EngineError::Internal(e.to_string()))?;
        for id in &plan.topo_order {
            if previously_succeeded.get(id).copied() == Some(ArtifactStatus::Succeeded) {
                statuses.insert(id.clone(), ArtifactStatus::Succeeded);
                self.advance(id, &dependents, &mut indegree, &mut ready);
            }
        }
        for (id, &degree) in &indegree {
            if degree == 0 && statuses.get(id) != Some(&ArtifactStatus::Succeeded) {
                ready.insert(id.clone());
            }
        }

        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        let mut in_flight: JoinSet<(ArtifactId, Option<Result<Message, String>>)> = JoinSet::new();
        let mut halt: Option<Halt> = None;

        while !ready.is_empty() || !in_flight.is_empty() {
            while halt.is_none() && !ready.is_empty() && in_flight.len() < config.max_concurrency {
                if cancel.is_cancelled() {
                    halt = Some(Halt::Token);
                    break;
                }

                let id = ready.iter().next().expect("checked non-empty").clone();
                ready.remove(&id);
                let art = plan.artifacts.get(&id).expect("planned artifact disappeared");

                if let Some(reuse) = &art.reuse {
                    self.apply_reuse(run_id, reuse, &id, &mut statuses).await?;
                    self.advance(&id, &dependents, &mut indegree, &mut ready);
                    continue;
                }

                let (component, inputs) = match &art.component {
                    PlannedComponent::Source(source) => (Work::Source(source.clone()), Vec::new()),
                    PlannedComponent::Processor { component, producers, merge } => {
                        match self.gather_inputs(producers, *merge, run_id, &statuses, &id).await? {
                            Some(inputs) => (Work::Processor(component.clone()), inputs),
                            None => {
                                self.mark(run_id, &id, ArtifactStatus::Skipped, &mut statuses).await?;
                                if !art.optional {
                                    halt = Some(Halt::Failure);
                                }
                                self.advance(&id, &dependents, &mut indegree, &mut ready);
                                continue;
                            }
                        }
                    }
                };

                self.mark(run_id, &id, ArtifactStatus::Running, &mut statuses).await?;

                let permit = semaphore.clone().acquire_owned().await.map_err(|_| EngineError::Cancelled)?;
                let output_schema = art.output_schema.clone();
                let id_for_task = id.clone();
                let cancelled = cancel.clone();

                in_flight.spawn(async move {
                    let _permit = permit;
                    let work = async move {
                        match component {
                            Work::Source(source) => source.extract().await.map_err(|e| e.to_string()),
                            Work::Processor(processor) => {
                                processor.process(inputs, output_schema).await.map_err(|e| e.to_string())
                            }
                        }
                    };
                    let outcome = tokio::select! {
                        () = cancelled.cancelled() => None,
                        result = work => Some(result),
                    };
                    (id_for_task, outcome)
                });
            }

            if halt.is_some() && in_flight.is_empty() {
                break;
            }

            let Some(joined) = in_flight.join_next().await else { continue };
            let (id, outcome) = joined.map_err(|e| EngineError::Internal(e.to_string()))?;
            let art = plan.artifacts.get(&id).expect("planned artifact disappeared");

            match outcome {
                None => {
                    // Lost the race with the cancellation token: the
                    // component call never got to finish.
                    self.mark(run_id, &id, ArtifactStatus::Cancelled, &mut statuses).await?;
                    halt = Some(Halt::Token);
                }
                Some(Ok(message)) => {
                    self.artifact_store
                        .save(run_id, &StorageKey::from(&id), &message)
                        .await
                        .map_err(|e| EngineError::Internal(e.to_string()))?;
                    self.mark(run_id, &id, ArtifactStatus::Succeeded, &mut statuses).await?;
                    info!(artifact = %id, "artifact succeeded");
                    self.advance(&id, &dependents, &mut indegree, &mut ready);
                }
                Some(Err(reason)) => {
                    warn!(artifact = %id, error = %reason, "artifact failed");
                    self.mark(run_id, &id, ArtifactStatus::Failed, &mut statuses).await?;
                    if matches!(art.component, PlannedComponent::Processor { .. }) && !art.optional {
                        halt = Some(Halt::Failure);
                    }
                    self.advance(&id, &dependents, &mut indegree, &mut ready);
                }
            }
        }

        match halt {
            Some(Halt::Token) => {
                self.cancel_remaining(run_id, plan, &mut statuses).await?;
                Err(EngineError::Cancelled)
            }
            Some(Halt::Failure) => {
                self.cancel_remaining(run_id, plan, &mut statuses).await?;
                Ok(RunSummary { run_id, statuses, failed: true })
            }
            None => Ok(RunSummary { run_id, statuses, failed: false }),
        }
    }

    /// Mark every artifact still short of a terminal status as `Cancelled`
    /// once the run has decided to stop admitting new work.
    async fn cancel_remaining(
        &self,
        run_id: RunId,
        plan: &ExecutionPlan,
        statuses: &mut HashMap<ArtifactId, ArtifactStatus>,
    ) -> EngineResult<()> {
        let pending: Vec<ArtifactId> = plan
            .artifacts
            .keys()
            .filter(|id| matches!(statuses.get(*id), Some(ArtifactStatus::Pending)))
            .cloned()
            .collect();
        for id in pending {
            self.mark(run_id, &id, ArtifactStatus::Cancelled, statuses).await?;
        }
        Ok(())
    }

    /// Fetch every producer's content, in declaration order. Returns `None`
    /// if any producer did not succeed — the caller skips this artifact
    /// entirely rather than running it against a partial input set. A
    /// fanned-in set of producers is combined by `merge` into the single
    /// effective message the processor receives; a lone producer's message
    /// is passed through untouched.
    async fn gather_inputs(
        &self,
        producers: &[ArtifactId],
        merge: Option<MergeStrategy>,
        run_id: RunId,
        statuses: &HashMap<ArtifactId, ArtifactStatus>,
        consumer: &ArtifactId,
    ) -> EngineResult<Option<Vec<Message>>> {
        if producers.iter().any(|p| statuses.get(p).copied() != Some(ArtifactStatus::Succeeded)) {
            return Ok(None);
        }

        let mut parts = Vec::with_capacity(producers.len());
        for producer in producers {
            let message = self
                .artifact_store
                .get(run_id, &StorageKey::from(producer))
                .await
                .map_err(|e| EngineError::Internal(e.to_string()))?;
            parts.push(message);
        }

        match merge {
            None => Ok(Some(parts)),
            Some(MergeStrategy::Concatenate) => {
                let Some(first) = parts.first() else { return Ok(None) };
                let schema = first.schema.clone();
                let refs: Vec<&MessageContent> = parts.iter().map(|m| &m.content).collect();
                let merged = MessageContent::concatenate_data_sequences(&refs);
                Ok(Some(vec![Message::new(consumer.to_string(), schema, merged)]))
            }
        }
    }

    /// Copy `reuse.artifact` from `reuse.from_run` into this run under
    /// `id`. The planner already confirmed the source exists; a failure
    /// here means it was removed between planning and execution.
    async fn apply_reuse(
        &self,
        run_id: RunId,
        reuse: &ReuseDef,
        id: &ArtifactId,
        statuses: &mut HashMap<ArtifactId, ArtifactStatus>,
    ) -> EngineResult<()> {
        let message = self
            .artifact_store
            .get(reuse.from_run, &StorageKey::from(&reuse.artifact))
            .await
            .map_err(|_| EngineError::MissingReusedArtifact(id.clone()))?;
        self.artifact_store
            .save(run_id, &StorageKey::from(id), &message)
            .await
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        self.mark(run_id, id, ArtifactStatus::Succeeded, statuses).await
    }

    async fn mark(
        &self,
        run_id: RunId,
        id: &ArtifactId,
        status: ArtifactStatus,
        statuses: &mut HashMap<ArtifactId, ArtifactStatus>,
    ) -> EngineResult<()> {
        statuses.insert(id.clone(), status);
        self.state_store
            .set_artifact_status(run_id, id, status)
            .await
            .map_err(|e| EngineError::Internal(e.to_string()))
    }

    fn advance(
        &self,
        id: &ArtifactId,
        dependents: &HashMap<ArtifactId, Vec<ArtifactId>>,
        indegree: &mut HashMap<ArtifactId, usize>,
        ready: &mut BTreeSet<ArtifactId>,
    ) {
        let Some(children) = dependents.get(id) else { return };
        for child in children {
            if let Some(count) = indegree.get_mut(child) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.insert(child.clone());
                }
            }
        }
    }
}

/// The instantiated component a spawned task actually calls; distinct from
/// [`PlannedComponent`] so the task only carries what it needs to run, not
/// the planner's bookkeeping around it.
enum Work {
    Source(Arc<dyn waivern_core::Source>),
    Processor(Arc<dyn waivern_core::Processor>),
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
