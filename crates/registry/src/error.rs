// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use waivern_core::FactoryError;

/// Which table an unknown-component lookup missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownComponentKind {
    Source,
    Processor,
}

waivern_core::simple_display! {
    UnknownComponentKind {
        Source => "source",
        Processor => "processor",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown {kind} {name:?}")]
    Unknown { kind: UnknownComponentKind, name: String },

    #[error(transparent)]
    Factory(#[from] FactoryError),
}
