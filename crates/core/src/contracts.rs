// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component contracts: the traits every plugin implements.

use std::error::Error as StdError;

use async_trait::async_trait;
use serde_json::Value;

use crate::message::Message;
use crate::schema::Schema;

/// One named input slot in a processor's alternative wiring, with the
/// schemas it accepts on that slot.
///
/// A processor's full input contract is `Vec<Vec<InputRequirement>>`: the
/// outer `Vec` lists alternative wirings (only one needs to be fully
/// satisfiable), the inner `Vec` is a conjunction within that wiring
/// (every slot in the group must resolve to a successful producer).
/// Whether an unmet wiring skips just this artifact or fails the run is
/// governed by the artifact's own `optional` flag in the runbook.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRequirement {
    pub name: String,
    pub accepted_schemas: Vec<Schema>,
}

impl InputRequirement {
    pub fn new(name: impl Into<String>, accepted_schemas: Vec<Schema>) -> Self {
        Self { name: name.into(), accepted_schemas }
    }
}

/// A component that produces a [`Message`] with no artifact-level input.
/// Sources sit at the roots of the dependency graph.
#[async_trait]
pub trait Source: Send + Sync + 'static {
    /// The schemas this source may produce; the planner picks the one a
    /// consumer's accepted schemas resolve to.
    fn output_schemas(&self) -> Vec<Schema>;

    /// Produce this artifact's content.
    async fn extract(&self) -> Result<Message, Box<dyn StdError + Send + Sync>>;
}

/// A component that consumes one or more input messages and produces one
/// output message. Processors sit at internal/leaf nodes of the
/// dependency graph.
#[async_trait]
pub trait Processor: Send + Sync + 'static {
    /// Alternative input wirings this processor accepts, outer `Vec`
    /// alternatives, inner `Vec` a conjunction of named slots.
    fn input_requirements(&self) -> Vec<Vec<InputRequirement>>;

    /// The schema(s) this processor can publish. When more than one is
    /// declared, the planner resolves the one a downstream consumer
    /// accepts, falling back to [`crate::schema::pick_default_output`]
    /// when nothing downstream disambiguates it.
    fn output_schemas(&self) -> Vec<Schema>;

    /// Run against the resolved input messages, in the order the planner
    /// matched them to the chosen wiring's slots, tagging the result with
    /// the `output_schema` the planner resolved for this artifact.
    async fn process(
        &self,
        inputs: Vec<Message>,
        output_schema: Schema,
    ) -> Result<Message, Box<dyn StdError + Send + Sync>>;
}

/// Errors from instantiating a component from its runbook configuration.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("invalid configuration for component {component:?}: {reason}")]
    InvalidConfig { component: String, reason: String },
}

/// A constructor for one named, versioned component kind. The
/// registry holds one `Factory` per `(kind, name)` pair and calls it once
/// per artifact that declares that component in its runbook.
pub trait Factory: Send + Sync + 'static {
    type Component;

    /// The component name as it appears in a runbook's `source.type` /
    /// `process.type` field.
    fn name(&self) -> &'static str;

    /// Build one instance from its raw (already-interpolated) JSON
    /// `properties` mapping.
    fn create(&self, properties: Value) -> Result<Self::Component, FactoryError>;
}

pub type SourceFactory = dyn Factory<Component = Box<dyn Source>>;
pub type ProcessorFactory = dyn Factory<Component = Box<dyn Processor>>;
