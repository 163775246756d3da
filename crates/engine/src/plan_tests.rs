// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use waivern_core::{FactoryError, FakeProcessor, FakeSource, Message, MessageContent, RunId, Version};
use waivern_registry::Registry;
use waivern_storage::InMemoryArtifactStore;

fn parse(yaml: &str) -> Runbook {
    waivern_runbook::parser::parse(yaml).unwrap()
}

fn raw_schema() -> Schema {
    Schema::new("raw", Version::new(1, 0, 0))
}

fn parsed_schema() -> Schema {
    Schema::new("parsed", Version::new(1, 0, 0))
}

struct FileReaderFactory;

impl waivern_core::Factory for FileReaderFactory {
    type Component = Box<dyn Source>;

    fn name(&self) -> &'static str {
        "file_reader"
    }

    fn create(&self, _properties: serde_json::Value) -> Result<Self::Component, FactoryError> {
        let message = Message::new("raw", raw_schema(), MessageContent::Text("hi".into()));
        Ok(Box::new(FakeSource::succeeding(message)))
    }
}

struct JsonParserFactory;

impl waivern_core::Factory for JsonParserFactory {
    type Component = Box<dyn Processor>;

    fn name(&self) -> &'static str {
        "json_parser"
    }

    fn create(&self, _properties: serde_json::Value) -> Result<Self::Component, FactoryError> {
        let requirement = waivern_core::InputRequirement::new("data", vec![raw_schema()]);
        let message = Message::new("out", parsed_schema(), MessageContent::Text("parsed".into()));
        Ok(Box::new(FakeProcessor::succeeding(vec![requirement], message)))
    }
}

/// A processor accepting its own output schema, so two instances can be
/// chained into a cycle without tripping a schema mismatch first.
struct EchoFactory;

impl waivern_core::Factory for EchoFactory {
    type Component = Box<dyn Processor>;

    fn name(&self) -> &'static str {
        "echo"
    }

    fn create(&self, _properties: serde_json::Value) -> Result<Self::Component, FactoryError> {
        let requirement = waivern_core::InputRequirement::new("data", vec![parsed_schema()]);
        let message = Message::new("out", parsed_schema(), MessageContent::Text("echoed".into()));
        Ok(Box::new(FakeProcessor::succeeding(vec![requirement], message)))
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_source(FileReaderFactory);
    registry.register_processor(JsonParserFactory);
    registry.register_processor(EchoFactory);
    registry
}

async fn plan(yaml: &str) -> EngineResult<ExecutionPlan> {
    let runbook = parse(yaml);
    let registry = registry();
    let artifact_store = InMemoryArtifactStore::new();
    build_plan(&runbook, &registry, &artifact_store).await
}

const CHAIN: &str = r#"
name: pipeline
description: a source feeding one processor
artifacts:
  raw:
    source:
      type: file_reader
  parsed:
    process:
      type: json_parser
    inputs: raw
"#;

#[tokio::test]
async fn plan_includes_every_artifact_exactly_once() {
    let plan = plan(CHAIN).await.unwrap();
    assert_eq!(plan.topo_order.len(), 2);
    assert_eq!(plan.artifacts.len(), 2);
}

#[tokio::test]
async fn raw_comes_before_parsed() {
    let plan = plan(CHAIN).await.unwrap();
    let raw_pos = plan.topo_order.iter().position(|id| id.as_str() == "raw").unwrap();
    let parsed_pos = plan.topo_order.iter().position(|id| id.as_str() == "parsed").unwrap();
    assert!(raw_pos < parsed_pos);
}

#[tokio::test]
async fn each_planned_artifact_carries_its_resolved_output_schema() {
    let plan = plan(CHAIN).await.unwrap();
    let raw = &plan.artifacts[&ArtifactId::new("raw").unwrap()];
    assert_eq!(raw.output_schema, raw_schema());
    let parsed = &plan.artifacts[&ArtifactId::new("parsed").unwrap()];
    assert_eq!(parsed.output_schema, parsed_schema());
}

#[tokio::test]
async fn cyclic_dependencies_are_rejected() {
    let err = plan(
        r#"
name: pipeline
description: two processors each depending on the other
artifacts:
  a:
    process:
      type: echo
    inputs: b
  b:
    process:
      type: echo
    inputs: a
"#,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::Cycle(_)));
}

#[tokio::test]
async fn dependents_of_reports_downstream_artifacts() {
    let plan = plan(CHAIN).await.unwrap();
    let raw_id = ArtifactId::new("raw").unwrap();
    let dependents: Vec<&str> = plan.dependents_of(&raw_id).into_iter().map(|id| id.as_str()).collect();
    assert_eq!(dependents, vec!["parsed"]);
}

#[tokio::test]
async fn an_unknown_source_type_is_rejected() {
    let err = plan(
        r#"
name: pipeline
description: a runbook naming an unregistered source
artifacts:
  raw:
    source:
      type: nonexistent
"#,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::UnknownComponent { kind: "source", .. }));
}

#[tokio::test]
async fn an_unknown_processor_type_is_rejected() {
    let err = plan(
        r#"
name: pipeline
description: a runbook naming an unregistered processor
artifacts:
  raw:
    source:
      type: file_reader
  parsed:
    process:
      type: nonexistent
    inputs: raw
"#,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::UnknownComponent { kind: "processor", .. }));
}

#[tokio::test]
async fn an_incompatible_schema_wiring_is_rejected_at_plan_time() {
    // `echo` only accepts `parsed`-schema input, but `raw`'s source
    // produces `raw`-schema output.
    let err = plan(
        r#"
name: pipeline
description: a processor wired to an incompatible upstream schema
artifacts:
  raw:
    source:
      type: file_reader
  echoed:
    process:
      type: echo
    inputs: raw
"#,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::SchemaIncompatibility { .. }));
}

#[tokio::test]
async fn reusing_an_artifact_that_was_never_produced_fails_at_plan_time() {
    let err = plan(&format!(
        r#"
name: pipeline
description: reusing an artifact that was never produced
artifacts:
  raw:
    source:
      type: file_reader
    reuse:
      from_run: {}
      artifact: raw
"#,
        RunId::new()
    ))
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::MissingReusedArtifact(_)));
}

#[tokio::test]
async fn reusing_an_artifact_that_exists_plans_successfully() {
    let registry = registry();
    let artifact_store = InMemoryArtifactStore::new();
    let prior_run = RunId::new();
    let artifact = ArtifactId::new("raw").unwrap();
    let message = Message::new("raw", raw_schema(), MessageContent::Text("hi".into()));
    artifact_store.save(prior_run, &StorageKey::from(&artifact), &message).await.unwrap();

    let runbook = parse(&format!(
        r#"
name: pipeline
description: reusing an artifact that exists
artifacts:
  raw:
    source:
      type: file_reader
    reuse:
      from_run: {prior_run}
      artifact: raw
"#
    ));
    let plan = build_plan(&runbook, &registry, &artifact_store).await.unwrap();
    assert_eq!(plan.artifacts[&artifact].reuse.as_ref().unwrap().from_run, prior_run);
}
