// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unit exchanged between artifacts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Opaque structured content carried by a [`Message`].
///
/// Modeled as a tagged variant rather than a type-erased `serde_json::Value`
/// so that merging and schema-aware equality stay total
/// over a closed set of shapes. `serde_json::Value` is still used, but only
/// at the parser/store I/O boundary (see [`MessageContent::from_json`] /
/// [`MessageContent::into_json`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Sequence(Vec<MessageContent>),
    Mapping(IndexMap<String, MessageContent>),
}

impl MessageContent {
    pub fn sequence(items: impl IntoIterator<Item = MessageContent>) -> Self {
        MessageContent::Sequence(items.into_iter().collect())
    }

    /// Borrow the inner items if this is a [`MessageContent::Sequence`].
    pub fn as_sequence(&self) -> Option<&[MessageContent]> {
        match self {
            MessageContent::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Concatenate the `data` sequence of several mappings that each carry a
    /// `data` key holding a sequence (the shape produced by `standard_input`
    /// sources), preserving declaration order. Used for `merge: concatenate`
    /// fan-in.
    pub fn concatenate_data_sequences(messages: &[&MessageContent]) -> MessageContent {
        let mut merged = Vec::new();
        for content in messages {
            if let MessageContent::Mapping(map) = content {
                if let Some(MessageContent::Sequence(items)) = map.get("data") {
                    merged.extend(items.iter().cloned());
                }
            }
        }
        let mut out = IndexMap::new();
        out.insert("data".to_string(), MessageContent::Sequence(merged));
        MessageContent::Mapping(out)
    }

    /// Convert from a parsed JSON value (parser/store I/O boundary only).
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => MessageContent::Null,
            serde_json::Value::Bool(b) => MessageContent::Bool(b),
            serde_json::Value::Number(n) => MessageContent::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => MessageContent::Text(s),
            serde_json::Value::Array(items) => {
                MessageContent::Sequence(items.into_iter().map(MessageContent::from_json).collect())
            }
            serde_json::Value::Object(map) => MessageContent::Mapping(
                map.into_iter().map(|(k, v)| (k, MessageContent::from_json(v))).collect(),
            ),
        }
    }

    /// Convert to a JSON value (parser/store I/O boundary only).
    pub fn into_json(self) -> serde_json::Value {
        match self {
            MessageContent::Null => serde_json::Value::Null,
            MessageContent::Bool(b) => serde_json::Value::Bool(b),
            MessageContent::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            MessageContent::Text(s) => serde_json::Value::String(s),
            MessageContent::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(MessageContent::into_json).collect())
            }
            MessageContent::Mapping(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into_json())).collect(),
            ),
        }
    }
}

/// The unit exchanged between artifacts. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub schema: Schema,
    pub content: MessageContent,
}

impl Message {
    pub fn new(id: impl Into<String>, schema: Schema, content: MessageContent) -> Self {
        Self { id: id.into(), schema, content }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
