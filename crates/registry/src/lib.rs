// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! waivern-registry: static lookup of source and processor factories by name.
//!
//! There is no reflection or dynamic loading: every component a runbook can
//! reference must have been linked into the binary and handed to
//! [`Registry::new`] (or included in [`Registry::discover`]'s built-in
//! table) at startup.

mod error;

pub use error::{RegistryError, UnknownComponentKind};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use waivern_core::{Factory, FactoryError, Processor, Source};

type SourceFactoryRef = Arc<dyn Factory<Component = Box<dyn Source>>>;
type ProcessorFactoryRef = Arc<dyn Factory<Component = Box<dyn Processor>>>;

/// The set of component kinds a runbook's `source`/`process` field may name.
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

/// Lookup table of every source and processor factory the host process
/// knows about, keyed by the name a runbook's `source.type`/`process.type`
/// field gives.
#[derive(Default, Clone)]
pub struct Registry {
    sources: BTreeMap<&'static str, SourceFactoryRef>,
    processors: BTreeMap<&'static str, ProcessorFactoryRef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry pre-loaded with every built-in component this
    /// binary ships. Callers that need additional, host-specific
    /// components can still call [`Registry::register_source`] /
    /// [`Registry::register_processor`] on the result.
    ///
    /// The built-in table is currently empty: this binary does not yet
    /// ship any concrete `Source`/`Processor` implementations, only the
    /// contracts they implement against. Call sites should use this
    /// constructor regardless of that, so that adding a built-in later is
    /// a one-line change here rather than a change at every call site.
    pub fn discover() -> Self {
        Self::new()
    }

    /// Register one source factory. Panics on a duplicate name: two
    /// factories claiming the same name is a wiring bug caught at startup,
    /// not a runtime condition a runbook author can trigger.
    pub fn register_source(&mut self, factory: impl Factory<Component = Box<dyn Source>>) {
        let name = factory.name();
        let previous = self.sources.insert(name, Arc::new(factory));
        assert!(previous.is_none(), "duplicate source factory registered: {name:?}");
    }

    pub fn register_processor(&mut self, factory: impl Factory<Component = Box<dyn Processor>>) {
        let name = factory.name();
        let previous = self.processors.insert(name, Arc::new(factory));
        assert!(previous.is_none(), "duplicate processor factory registered: {name:?}");
    }

    pub fn create_source(&self, name: &str, properties: Value) -> Result<Box<dyn Source>, RegistryError> {
        let factory = self.sources.get(name).ok_or_else(|| RegistryError::Unknown {
            kind: UnknownComponentKind::Source,
            name: name.to_string(),
        })?;
        factory.create(properties).map_err(RegistryError::from)
    }

    pub fn create_processor(&self, name: &str, properties: Value) -> Result<Box<dyn Processor>, RegistryError> {
        let factory = self.processors.get(name).ok_or_else(|| RegistryError::Unknown {
            kind: UnknownComponentKind::Processor,
            name: name.to_string(),
        })?;
        factory.create(properties).map_err(RegistryError::from)
    }

    /// Names of every registered source, in a stable (sorted) order.
    pub fn list_sources(&self) -> Vec<&'static str> {
        self.sources.keys().copied().collect()
    }

    pub fn list_processors(&self) -> Vec<&'static str> {
        self.processors.keys().copied().collect()
    }

    pub fn has_source(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn has_processor(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("sources", &self.list_sources())
            .field("processors", &self.list_processors())
            .finish()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
