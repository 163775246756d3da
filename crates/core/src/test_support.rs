// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake component implementations shared by every crate's test suite.
//!
//! Only compiled under `test-support` (or within this crate's own tests).

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::contracts::{InputRequirement, Processor, Source};
use crate::message::Message;
use crate::schema::Schema;

/// A source that always returns a fixed message, or a fixed error.
#[derive(Clone)]
pub struct FakeSource {
    schema: Schema,
    result: Arc<Mutex<Option<Result<Message, String>>>>,
    calls: Arc<Mutex<u32>>,
}

impl FakeSource {
    pub fn succeeding(message: Message) -> Self {
        let schema = message.schema.clone();
        Self {
            schema,
            result: Arc::new(Mutex::new(Some(Ok(message)))),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(schema: Schema, reason: impl Into<String>) -> Self {
        Self {
            schema,
            result: Arc::new(Mutex::new(Some(Err(reason.into())))),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock()
    }
}

#[async_trait]
impl Source for FakeSource {
    fn output_schemas(&self) -> Vec<Schema> {
        vec![self.schema.clone()]
    }

    async fn extract(&self) -> Result<Message, Box<dyn StdError + Send + Sync>> {
        *self.calls.lock() += 1;
        match self.result.lock().clone() {
            Some(Ok(message)) => Ok(message),
            Some(Err(reason)) => Err(reason.into()),
            None => Err("fake source exhausted".into()),
        }
    }
}

/// A processor that records the inputs it was called with and returns a
/// fixed message, or a fixed error.
#[derive(Clone)]
pub struct FakeProcessor {
    input_requirements: Vec<Vec<InputRequirement>>,
    output_schemas: Vec<Schema>,
    result: Arc<Mutex<Option<Result<Message, String>>>>,
    received: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl FakeProcessor {
    /// Build a fake with a single (non-alternative) input wiring.
    pub fn succeeding(inputs: Vec<InputRequirement>, message: Message) -> Self {
        let output_schemas = vec![message.schema.clone()];
        Self {
            input_requirements: vec![inputs],
            output_schemas,
            result: Arc::new(Mutex::new(Some(Ok(message)))),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(inputs: Vec<InputRequirement>, output_schemas: Vec<Schema>, reason: impl Into<String>) -> Self {
        Self {
            input_requirements: vec![inputs],
            output_schemas,
            result: Arc::new(Mutex::new(Some(Err(reason.into())))),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn received_calls(&self) -> Vec<Vec<Message>> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl Processor for FakeProcessor {
    fn input_requirements(&self) -> Vec<Vec<InputRequirement>> {
        self.input_requirements.clone()
    }

    fn output_schemas(&self) -> Vec<Schema> {
        self.output_schemas.clone()
    }

    async fn process(
        &self,
        inputs: Vec<Message>,
        _output_schema: Schema,
    ) -> Result<Message, Box<dyn StdError + Send + Sync>> {
        self.received.lock().push(inputs);
        match self.result.lock().clone() {
            Some(Ok(message)) => Ok(message),
            Some(Err(reason)) => Err(reason.into()),
            None => Err("fake processor exhausted".into()),
        }
    }
}
